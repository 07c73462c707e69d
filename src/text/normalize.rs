//! Text normalization.
//!
//! Chinese text gets its numeric literals spelled out in hanzi before
//! punctuation filtering; English text is lowercased and has times,
//! abbreviations and numbers expanded into words.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

const ZH_DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
/// Digit reading used for standalone digit strings (幺 for 1).
const ZH_DIGITS_DIRECT: [char; 10] =
    ['零', '幺', '二', '三', '四', '五', '六', '七', '八', '九'];
const ZH_UNITS: [&str; 4] = ["", "十", "百", "千"];

/// Spell an integer semantically, e.g. `"23"` → 二十三. Numbers longer than
/// four digits or with a leading zero are read digit by digit.
fn number_to_chinese(num: &str) -> String {
    if num.len() > 4 || num.starts_with('0') {
        return digits_to_chinese(num, &ZH_DIGITS);
    }
    let digits: Vec<u32> = num.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.iter().all(|&d| d == 0) {
        return "零".to_string();
    }
    let len = digits.len();
    let mut out = String::new();
    let mut pending_zero = false;
    for (i, &d) in digits.iter().enumerate() {
        let pos = len - 1 - i;
        if d == 0 {
            pending_zero = true;
            continue;
        }
        if pending_zero && !out.is_empty() {
            out.push('零');
        }
        // 10..19 reads 十 without a leading 一
        if !(d == 1 && pos == 1 && i == 0) {
            out.push(ZH_DIGITS[d as usize]);
        }
        out.push_str(ZH_UNITS[pos]);
        pending_zero = false;
    }
    out
}

fn digits_to_chinese(num: &str, table: &[char; 10]) -> String {
    num.chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| table[d as usize])
        .collect()
}

/// Spell a number that may carry a decimal part, read 点-digit-by-digit.
fn number_to_chinese_with_decimal(num: &str) -> String {
    match num.split_once('.') {
        Some((int_part, dec_part)) => {
            let int_zh = if int_part.is_empty() || int_part == "0" {
                "零".to_string()
            } else {
                number_to_chinese(int_part)
            };
            format!("{}点{}", int_zh, digits_to_chinese(dec_part, &ZH_DIGITS))
        }
        None => number_to_chinese(num),
    }
}

lazy_static! {
    static ref RE_FRACTION: Regex = Regex::new(r"(-?)(\d+)/(\d+)").expect("fraction regex");
    static ref RE_PERCENT: Regex = Regex::new(r"(-?)(\d+(?:\.\d+)?)%").expect("percent regex");
    static ref RE_NUMBER: Regex = Regex::new(r"(-?)(\d+(?:\.\d+)?)").expect("number regex");
    static ref RE_TIME_EN: Regex = Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("time regex");
    static ref RE_NUMBER_EN: Regex = Regex::new(r"\d+").expect("en number regex");
    static ref EN_ABBREVIATIONS: Vec<(Regex, &'static str)> = [
        ("mrs", "misess"),
        ("mr", "mister"),
        ("dr", "doctor"),
        ("st", "saint"),
        ("co", "company"),
        ("jr", "junior"),
        ("maj", "major"),
        ("gen", "general"),
        ("drs", "doctors"),
        ("rev", "reverend"),
        ("lt", "lieutenant"),
        ("hon", "honorable"),
        ("sgt", "sergeant"),
        ("capt", "captain"),
        ("esq", "esquire"),
        ("ltd", "limited"),
        ("col", "colonel"),
        ("ft", "fort"),
    ]
    .into_iter()
    .map(|(abbr, full)| {
        let re = Regex::new(&format!(r"\b{abbr}\.")).expect("abbreviation regex");
        (re, full)
    })
    .collect();
}

/// Spell fractions, percentages, decimals and integers in hanzi. Applied
/// before punctuation filtering so the markers still separate numbers.
pub fn normalize_numbers_zh(text: &str) -> String {
    let text = RE_FRACTION.replace_all(text, |caps: &Captures| {
        let sign = if &caps[1] == "-" { "负" } else { "" };
        format!(
            "{}{}分之{}",
            sign,
            number_to_chinese(&caps[3]),
            number_to_chinese(&caps[2])
        )
    });
    let text = RE_PERCENT.replace_all(&text, |caps: &Captures| {
        let sign = if &caps[1] == "-" { "负" } else { "" };
        format!("{}百分之{}", sign, number_to_chinese_with_decimal(&caps[2]))
    });
    RE_NUMBER
        .replace_all(&text, |caps: &Captures| {
            let sign = if &caps[1] == "-" { "负" } else { "" };
            let num = &caps[2];
            let spelled = if !num.contains('.') && num.len() >= 3 {
                // long plain digit strings read digit by digit, 幺 for 1
                digits_to_chinese(num, &ZH_DIGITS_DIRECT)
            } else {
                number_to_chinese_with_decimal(num)
            };
            format!("{sign}{spelled}")
        })
        .to_string()
}

const EN_ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const EN_TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Spell a non-negative integer in English words (up to the billions;
/// anything larger is read digit by digit).
fn int_to_words(value: u64) -> String {
    match value {
        0..=19 => EN_ONES[value as usize].to_string(),
        20..=99 => {
            let tens = EN_TENS[(value / 10) as usize];
            if value % 10 == 0 {
                tens.to_string()
            } else {
                format!("{} {}", tens, EN_ONES[(value % 10) as usize])
            }
        }
        100..=999 => {
            let head = format!("{} hundred", EN_ONES[(value / 100) as usize]);
            if value % 100 == 0 {
                head
            } else {
                format!("{} {}", head, int_to_words(value % 100))
            }
        }
        1_000..=999_999 => compose_words(value, 1_000, "thousand"),
        1_000_000..=999_999_999 => compose_words(value, 1_000_000, "million"),
        1_000_000_000..=999_999_999_999 => compose_words(value, 1_000_000_000, "billion"),
        _ => value
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| EN_ONES[d as usize])
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn compose_words(value: u64, scale: u64, name: &str) -> String {
    let head = format!("{} {}", int_to_words(value / scale), name);
    if value % scale == 0 {
        head
    } else {
        format!("{} {}", head, int_to_words(value % scale))
    }
}

fn expand_time(text: &str) -> String {
    RE_TIME_EN
        .replace_all(text, |caps: &Captures| {
            let hour: u64 = caps[1].parse().unwrap_or(0);
            let minute: u64 = caps[2].parse().unwrap_or(0);
            if minute == 0 {
                format!("{} o'clock", int_to_words(hour))
            } else if minute < 10 {
                format!("{} oh {}", int_to_words(hour), int_to_words(minute))
            } else {
                format!("{} {}", int_to_words(hour), int_to_words(minute))
            }
        })
        .to_string()
}

fn expand_abbreviations(text: &str) -> String {
    let mut out = text.to_string();
    for (re, full) in EN_ABBREVIATIONS.iter() {
        out = re.replace_all(&out, *full).to_string();
    }
    out
}

fn expand_numbers(text: &str) -> String {
    RE_NUMBER_EN
        .replace_all(text, |caps: &Captures| {
            match caps[0].parse::<u64>() {
                Ok(value) => int_to_words(value),
                Err(_) => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Normalize English text: lowercase, then expand times, abbreviations and
/// numbers. Runs before sentence splitting so abbreviation periods never
/// look like sentence ends.
pub fn normalize_english(text: &str) -> String {
    let lower: String = text.chars().map(|c| c.to_ascii_lowercase()).collect();
    let expanded = expand_time(&lower);
    let expanded = expand_abbreviations(&expanded);
    expand_numbers(&expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers_semantic() {
        assert_eq!(number_to_chinese("0"), "零");
        assert_eq!(number_to_chinese("10"), "十");
        assert_eq!(number_to_chinese("23"), "二十三");
        assert_eq!(number_to_chinese("1005"), "一千零五");
    }

    #[test]
    fn long_numbers_digit_by_digit() {
        assert_eq!(number_to_chinese("20240"), "二零二四零");
    }

    #[test]
    fn decimals_read_point() {
        assert_eq!(number_to_chinese_with_decimal("3.14"), "三点一四");
        assert_eq!(number_to_chinese_with_decimal("0.5"), "零点五");
    }

    #[test]
    fn fractions_and_percent() {
        assert_eq!(normalize_numbers_zh("1/2"), "二分之一");
        assert_eq!(normalize_numbers_zh("70%"), "百分之七十");
        assert_eq!(normalize_numbers_zh("-70%"), "负百分之七十");
    }

    #[test]
    fn plain_numbers_in_text() {
        assert_eq!(normalize_numbers_zh("我有25块"), "我有二十五块");
        assert_eq!(normalize_numbers_zh("拨打110"), "拨打幺幺零");
    }

    #[test]
    fn english_ints() {
        assert_eq!(int_to_words(0), "zero");
        assert_eq!(int_to_words(15), "fifteen");
        assert_eq!(int_to_words(42), "forty two");
        assert_eq!(int_to_words(900), "nine hundred");
        assert_eq!(int_to_words(1234), "one thousand two hundred thirty four");
    }

    #[test]
    fn english_time() {
        assert_eq!(expand_time("at 3:30 pm"), "at three thirty pm");
        assert_eq!(expand_time("at 5:00"), "at five o'clock");
        assert_eq!(expand_time("at 5:05"), "at five oh five");
    }

    #[test]
    fn english_abbreviations() {
        assert_eq!(
            normalize_english("Dr. Smith met Mr. Jones"),
            "doctor smith met mister jones"
        );
    }

    #[test]
    fn english_numbers_expanded() {
        assert_eq!(normalize_english("I have 2 cats"), "i have two cats");
    }
}
