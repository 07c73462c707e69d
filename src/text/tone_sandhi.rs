//! Mandarin tone sandhi.
//!
//! Four context-sensitive rules rewrite the trailing tone digit of a word's
//! finals: 不 sandhi, 一 sandhi, neutral-tone assignment and third-tone
//! sandhi. `finals[i]` is aligned 1:1 with the i-th character of the word
//! and is mutated in place.
//!
//! Segmentation output is pre-merged first: jieba tends to emit 不, 一 and
//! reduplicated characters as standalone tokens, which would hide the
//! patterns the rules key on.

use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::text::is_punctuation;
use crate::text::jieba_seg::Segmenter;

lazy_static! {
    /// Words whose last syllable is read with the neutral tone.
    static ref MUST_NEURAL_TONE_WORDS: HashSet<&'static str> = [
        "麻烦", "麻利", "鸳鸯", "高粱", "骨头", "骆驼", "马虎", "首饰", "馒头", "馄饨",
        "风筝", "难为", "队伍", "阔气", "闺女", "门道", "锄头", "铺盖", "铃铛", "铁匠",
        "钥匙", "里脊", "里头", "部分", "那么", "道士", "造化", "迷糊", "连累", "这么",
        "这个", "运气", "过去", "软和", "转悠", "踏实", "跳蚤", "跟头", "趔趄", "财主",
        "豆腐", "讲究", "记性", "记号", "认识", "规矩", "见识", "裁缝", "补丁", "衣裳",
        "衣服", "衙门", "街坊", "行李", "行当", "蛤蟆", "蘑菇", "薄荷", "葫芦", "葡萄",
        "萝卜", "荸荠", "苗条", "苗头", "苍蝇", "芝麻", "舒服", "舒坦", "舌头", "自在",
        "膏药", "脾气", "脑袋", "脊梁", "能耐", "胳膊", "胭脂", "胡萝", "胡琴", "胡同",
        "聪明", "耽误", "耽搁", "耷拉", "耳朵", "老爷", "老实", "老婆", "老头", "老太",
        "翻腾", "罗嗦", "罐头", "编辑", "结实", "红火", "累赘", "糨糊", "糊涂", "精神",
        "粮食", "簸箕", "篱笆", "算计", "算盘", "答应", "笤帚", "笑语", "笑话", "窟窿",
        "窝囊", "窗户", "稳当", "稀罕", "称呼", "秧歌", "秀气", "秀才", "福气", "祖宗",
        "砚台", "码头", "石榴", "石头", "石匠", "知识", "眼睛", "眯缝", "眨巴", "眉毛",
        "相声", "盘算", "白净", "痢疾", "痛快", "疟疾", "疙瘩", "疏忽", "畜生", "生意",
        "甘蔗", "琵琶", "琢磨", "琉璃", "玻璃", "玫瑰", "玄乎", "狐狸", "状元", "特务",
        "牲口", "牙碜", "牌楼", "爽快", "爱人", "热闹", "烧饼", "烟筒", "烂糊", "点心",
        "炊帚", "灯笼", "火候", "漂亮", "滑溜", "溜达", "温和", "清楚", "消息", "浪头",
        "活泼", "比方", "正经", "欺负", "模糊", "槟榔", "棺材", "棒槌", "棉花", "核桃",
        "栅栏", "柴火", "架势", "枕头", "枇杷", "机灵", "本事", "木头", "木匠", "朋友",
        "月饼", "月亮", "暖和", "明白", "时候", "新鲜", "故事", "收拾", "收成", "提防",
        "挖苦", "挑剔", "指甲", "指头", "拾掇", "拳头", "拨弄", "招牌", "招呼", "抬举",
        "护士", "折腾", "扫帚", "打量", "打算", "打点", "打扮", "打听", "打发", "扎实",
        "扁担", "戒指", "懒得", "意识", "意思", "情形", "悟性", "怪物", "思量", "怎么",
        "念头", "念叨", "快活", "忙活", "志气", "心思", "得罪", "张罗", "弟兄", "开通",
        "应酬", "庄稼", "干事", "帮手", "帐篷", "希罕", "师父", "师傅", "巴结", "巴掌",
        "差事", "工夫", "岁数", "屁股", "尾巴", "少爷", "小气", "小伙", "将就", "对头",
        "对付", "寡妇", "家伙", "客气", "实在", "官司", "学问", "学生", "字号", "嫁妆",
        "媳妇", "媒人", "婆家", "娘家", "委屈", "姑娘", "姐夫", "妯娌", "妥当", "妖精",
        "奴才", "女婿", "头发", "太阳", "大爷", "大方", "大意", "大夫", "多少", "多么",
        "外甥", "壮实", "地道", "地方", "在乎", "困难", "嘴巴", "嘱咐", "嘟囔", "嘀咕",
        "喜欢", "喇嘛", "喇叭", "商量", "唾沫", "哑巴", "哈欠", "哆嗦", "咳嗽", "和尚",
        "告诉", "告示", "含糊", "吓唬", "后头", "名字", "名堂", "合同", "吆喝", "叫唤",
        "口袋", "厚道", "厉害", "千斤", "包袱", "包涵", "匀称", "勤快", "动静", "动弹",
        "功夫", "力气", "前头", "刺猬", "刺激", "别扭", "利落", "利索", "利害", "分析",
        "出息", "凑合", "凉快", "冷战", "冤枉", "冒失", "养活", "关系", "先生", "兄弟",
        "便宜", "使唤", "佩服", "作坊", "体面", "位置", "似的", "伙计", "休息", "什么",
        "人家", "亲戚", "亲家", "交情", "云彩", "事情", "买卖", "主意", "丫头", "丧气",
        "两口", "东西", "东家", "世故", "不由", "不在", "下水", "下巴", "上头", "上司",
        "丈夫", "丈人", "一辈", "那个", "菩萨", "父亲", "母亲", "咕噜", "邋遢", "费用",
        "冤家", "甜头", "介绍", "荒唐", "大人", "泥鳅", "幸福", "熟悉", "计划", "扑腾",
        "蜡烛", "姥爷", "照顾", "喉咙", "吉他", "弄堂", "蚂蚱", "凤凰", "拖沓", "寒碜",
        "糟蹋", "倒腾", "报复", "逻辑", "盘缠", "喽啰", "牢骚", "咖喱", "扫把", "惦记",
    ]
    .into_iter()
    .collect();

    /// Words that look like reduplications or 子-suffixed nouns but keep
    /// their full tones.
    static ref MUST_NOT_NEURAL_TONE_WORDS: HashSet<&'static str> = [
        "男子", "女子", "分子", "原子", "量子", "莲子", "石子", "瓜子", "电子", "人人",
        "虎虎",
    ]
    .into_iter()
    .collect();
}

const CHINESE_NUMERALS: &str = "零一二三四五六七八九十百千万亿兆";

fn is_chinese_numeral(c: char) -> bool {
    CHINESE_NUMERALS.contains(c)
}

/// Overwrite the trailing tone digit of a final.
fn set_tone(final_str: &mut String, tone: char) {
    if final_str
        .chars()
        .last()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
    {
        final_str.pop();
    }
    final_str.push(tone);
}

fn ends_with_tone(finals: &[String], idx: usize, tone: char) -> bool {
    finals.get(idx).map(|f| f.ends_with(tone)).unwrap_or(false)
}

fn all_tone_three(finals: &[String]) -> bool {
    finals.iter().all(|f| f.ends_with('3'))
}

/// Apply all sandhi rules to one word. `finals[i]` aligns with the i-th
/// character of `word` and is rewritten in place.
pub fn modified_tone(word: &str, tag: &str, segmenter: &Segmenter, finals: &mut [String]) {
    let chars: Vec<char> = word.chars().collect();
    bu_sandhi(&chars, finals);
    yi_sandhi(&chars, finals);
    neural_sandhi(word, &chars, tag, segmenter, finals);
    three_sandhi(word, &chars, segmenter, finals);
}

/// 不 reads neutral between identical verbs (看不懂) and rises to tone 2
/// before a fourth tone (不怕).
fn bu_sandhi(chars: &[char], finals: &mut [String]) {
    if chars.len() == 3 && chars[1] == '不' {
        if let Some(f) = finals.get_mut(1) {
            set_tone(f, '5');
        }
        return;
    }
    for i in 0..chars.len() {
        if chars[i] == '不' && i + 1 < chars.len() && ends_with_tone(finals, i + 1, '4') {
            if let Some(f) = finals.get_mut(i) {
                set_tone(f, '2');
            }
        }
    }
}

/// 一 keeps tone 1 in numerals, reads neutral in X一X reduplications and in
/// ordinals (第一), rises to tone 2 before a fourth tone and falls to
/// tone 1 otherwise.
fn yi_sandhi(chars: &[char], finals: &mut [String]) {
    if chars.iter().all(|&c| is_chinese_numeral(c)) {
        return;
    }
    if chars.len() == 3 && chars[1] == '一' && chars[0] == chars[2] {
        if let Some(f) = finals.get_mut(1) {
            set_tone(f, '5');
        }
        return;
    }
    if chars.len() >= 2 && chars[0] == '第' && chars[1] == '一' {
        return;
    }
    for i in 0..chars.len() {
        if chars[i] == '一' && i + 1 < chars.len() {
            let tone = if ends_with_tone(finals, i + 1, '4') {
                '2'
            } else {
                '1'
            };
            if let Some(f) = finals.get_mut(i) {
                set_tone(f, tone);
            }
        }
    }
}

/// Neutral-tone assignment: fixed word list, reduplications, particles,
/// suffixes, directional complements and the measure word 个.
fn neural_sandhi(
    word: &str,
    chars: &[char],
    pos: &str,
    segmenter: &Segmenter,
    finals: &mut [String],
) {
    let n = chars.len();
    if n < 2 || MUST_NOT_NEURAL_TONE_WORDS.contains(word) {
        return;
    }
    let pos_head = pos.chars().next().unwrap_or('x');

    let last_two: String = chars[n - 2..].iter().collect();
    if MUST_NEURAL_TONE_WORDS.contains(last_two.as_str()) {
        if let Some(f) = finals.last_mut() {
            set_tone(f, '5');
        }
    }

    for i in 1..n {
        if chars[i] == chars[i - 1] && matches!(pos_head, 'n' | 'v' | 'a') {
            if let Some(f) = finals.get_mut(i) {
                set_tone(f, '5');
            }
        }
    }

    const PARTICLES: &str = "吧呢啊呐噻嘛吖嗨哦哒额滴哩哟喽啰耶喔诶的地得";
    const DIRECTIONAL_VERBS: &str = "上下进出回过起开";
    const GE_QUANTIFIERS: &str = "几有两半多各整每做是";

    let last = chars[n - 1];
    if PARTICLES.contains(last) {
        if let Some(f) = finals.last_mut() {
            set_tone(f, '5');
        }
    } else if (last == '们' || last == '字') && matches!(pos_head, 'n' | 'r') {
        if let Some(f) = finals.last_mut() {
            set_tone(f, '5');
        }
    } else if (last == '上' || last == '下' || last == '里') && matches!(pos_head, 's' | 'l' | 'f')
    {
        if let Some(f) = finals.last_mut() {
            set_tone(f, '5');
        }
    } else if (last == '来' || last == '去') && DIRECTIONAL_VERBS.contains(chars[n - 2]) {
        if let Some(f) = finals.last_mut() {
            set_tone(f, '5');
        }
    }

    // measure word 个 after a numeral or quantifier; only the first
    // occurrence is examined
    if let Some(ge_idx) = chars.iter().position(|&c| c == '个') {
        if ge_idx > 0 {
            let prev = chars[ge_idx - 1];
            if is_chinese_numeral(prev) || GE_QUANTIFIERS.contains(prev) {
                if let Some(f) = finals.get_mut(ge_idx) {
                    set_tone(f, '5');
                }
            }
        }
    }

    if segmenter.split_word(word) == 2 {
        let head: String = chars[..2].iter().collect();
        if MUST_NEURAL_TONE_WORDS.contains(head.as_str()) {
            if let Some(f) = finals.get_mut(1) {
                set_tone(f, '5');
            }
        }
    }
}

/// Third-tone sandhi over 2-, 3- and 4-character words. Three-character
/// words consult the sub-word split to pick the 2+1 or 1+2 pattern.
fn three_sandhi(word: &str, chars: &[char], segmenter: &Segmenter, finals: &mut [String]) {
    match chars.len() {
        2 => {
            if finals.len() == 2 && all_tone_three(finals) {
                if let Some(f) = finals.first_mut() {
                    set_tone(f, '2');
                }
            }
        }
        3 => {
            let first_len = segmenter.split_word(word);
            if all_tone_three(finals) {
                if first_len == 2 {
                    for i in 0..2 {
                        if let Some(f) = finals.get_mut(i) {
                            set_tone(f, '2');
                        }
                    }
                } else if first_len == 1 {
                    if let Some(f) = finals.get_mut(1) {
                        set_tone(f, '2');
                    }
                }
            } else {
                if !ends_with_tone(finals, 1, '3') {
                    return;
                }
                let first_three = ends_with_tone(finals, 0, '3');
                let third_three = ends_with_tone(finals, 2, '3');
                if !first_three && !third_three {
                    return;
                }
                if first_three {
                    if let Some(f) = finals.get_mut(0) {
                        set_tone(f, '2');
                    }
                } else if first_len == 1 {
                    if let Some(f) = finals.get_mut(1) {
                        set_tone(f, '2');
                    }
                }
            }
        }
        4 => {
            // idioms collapse as two independent pairs
            if ends_with_tone(finals, 0, '3') && ends_with_tone(finals, 1, '3') {
                if let Some(f) = finals.get_mut(0) {
                    set_tone(f, '2');
                }
            }
            if ends_with_tone(finals, 2, '3') && ends_with_tone(finals, 3, '3') {
                if let Some(f) = finals.get_mut(2) {
                    set_tone(f, '2');
                }
            }
        }
        _ => {}
    }
}

/// Re-segment jieba output so the sandhi rules see whole patterns.
pub fn pre_merge_for_modify(seg: Vec<(String, String)>) -> Vec<(String, String)> {
    let seg = merge_yi(seg);
    merge_chinese_patterns(seg)
}

/// Merge 一 between identical verbs (听/一/听 → 听一听) and glue a
/// standalone 一 onto the word after it.
fn merge_yi(seg: Vec<(String, String)>) -> Vec<(String, String)> {
    let n = seg.len();
    let mut new_seg: Vec<(String, String)> = Vec::with_capacity(n);
    let mut skip_next = false;
    for i in 0..n {
        if skip_next {
            skip_next = false;
            continue;
        }
        let (word, pos) = &seg[i];
        if i >= 1
            && word == "一"
            && i + 1 < n
            && seg[i - 1].0 == seg[i + 1].0
            && seg[i - 1].1 == "v"
        {
            if let Some(last) = new_seg.last_mut() {
                last.0.push('一');
                last.0.push_str(&seg[i + 1].0);
            }
            skip_next = true;
        } else if new_seg.last().map(|(w, _)| w == "一").unwrap_or(false) {
            if let Some(last) = new_seg.last_mut() {
                last.0.push_str(word);
            }
        } else {
            new_seg.push((word.clone(), pos.clone()));
        }
    }
    new_seg
}

/// Merge reduplications and 不/儿 attachments: a token equal to its
/// predecessor (unless punctuation), any token after 不, and a trailing 儿.
fn merge_chinese_patterns(seg: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut new_seg: Vec<(String, String)> = Vec::with_capacity(seg.len());
    for (word, pos) in seg {
        let merge_into_last = new_seg
            .last()
            .map(|(prev, _)| {
                let reduplication = word == *prev
                    && !word.chars().next().map(is_punctuation).unwrap_or(false);
                reduplication || prev == "不"
            })
            .unwrap_or(false);
        if merge_into_last {
            if let Some(last) = new_seg.last_mut() {
                last.0.push_str(&word);
            }
        } else if word == "儿" && !new_seg.is_empty() {
            if let Some(last) = new_seg.last_mut() {
                last.0.push('儿');
            }
        } else {
            new_seg.push((word, pos));
        }
    }
    if let Some(last) = new_seg.last_mut() {
        if last.0 == "不" {
            last.1 = "d".to_string();
        }
    }
    new_seg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::jieba_seg::GLOBAL_SEGMENTER;

    fn pair(word: &str, pos: &str) -> (String, String) {
        (word.to_string(), pos.to_string())
    }

    #[test]
    fn bu_before_tone4() {
        let mut finals = vec!["u4".to_string(), "a4".to_string()];
        bu_sandhi(&['不', '怕'], &mut finals);
        assert_eq!(finals, vec!["u2".to_string(), "a4".to_string()]);
    }

    #[test]
    fn bu_in_middle_of_three() {
        let mut finals = vec!["an4".to_string(), "u4".to_string(), "ian4".to_string()];
        bu_sandhi(&['看', '不', '见'], &mut finals);
        assert_eq!(finals[1], "u5");
    }

    #[test]
    fn yi_before_tone4() {
        let mut finals = vec!["i1".to_string(), "ang4".to_string()];
        yi_sandhi(&['一', '样'], &mut finals);
        assert_eq!(finals[0], "i2");
    }

    #[test]
    fn yi_before_other_tone() {
        let mut finals = vec!["i1".to_string(), "i3".to_string()];
        yi_sandhi(&['一', '起'], &mut finals);
        assert_eq!(finals[0], "i1");
    }

    #[test]
    fn yi_reduplication_neutral() {
        let mut finals = vec!["an4".to_string(), "i1".to_string(), "an4".to_string()];
        yi_sandhi(&['看', '一', '看'], &mut finals);
        assert_eq!(finals[1], "i5");
    }

    #[test]
    fn yi_ordinal_untouched() {
        let mut finals = vec!["i4".to_string(), "i1".to_string()];
        yi_sandhi(&['第', '一'], &mut finals);
        assert_eq!(finals[1], "i1");
    }

    #[test]
    fn yi_numeral_sequence_untouched() {
        let mut finals = vec![
            "er4".to_string(),
            "ing2".to_string(),
            "i1".to_string(),
            "i1".to_string(),
        ];
        yi_sandhi(&['二', '零', '一', '一'], &mut finals);
        assert_eq!(finals[2], "i1");
        assert_eq!(finals[3], "i1");
    }

    #[test]
    fn neural_particle() {
        let mut finals = vec!["ao3".to_string(), "a1".to_string()];
        neural_sandhi("好吧", &['好', '吧'], "y", &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals[1], "a5");
    }

    #[test]
    fn neural_listed_word() {
        let mut finals = vec!["eng2".to_string(), "ou3".to_string()];
        neural_sandhi("朋友", &['朋', '友'], "n", &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals[1], "ou5");
    }

    #[test]
    fn neural_reduplication() {
        let mut finals = vec!["ai3".to_string(), "ai3".to_string()];
        neural_sandhi("奶奶", &['奶', '奶'], "n", &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals[1], "ai5");
    }

    #[test]
    fn neural_excluded_word_untouched() {
        let mut finals = vec!["en2".to_string(), "en2".to_string()];
        neural_sandhi("人人", &['人', '人'], "n", &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals[1], "en2");
    }

    #[test]
    fn neural_ge_after_numeral() {
        let mut finals = vec!["iang3".to_string(), "e4".to_string()];
        neural_sandhi("两个", &['两', '个'], "m", &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals[1], "e5");
    }

    #[test]
    fn third_tone_pair() {
        let mut finals = vec!["ma3".to_string(), "ma3".to_string()];
        three_sandhi("马马", &['马', '马'], &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals, vec!["ma2".to_string(), "ma3".to_string()]);
    }

    #[test]
    fn third_tone_four_char_idiom() {
        let mut finals = vec![
            "i3".to_string(),
            "ao3".to_string(),
            "i3".to_string(),
            "ao3".to_string(),
        ];
        three_sandhi(
            "领导领导",
            &['领', '导', '领', '导'],
            &GLOBAL_SEGMENTER,
            &mut finals,
        );
        assert_eq!(finals[0], "i2");
        assert_eq!(finals[1], "ao3");
        assert_eq!(finals[2], "i2");
        assert_eq!(finals[3], "ao3");
    }

    #[test]
    fn modified_tone_ni_hao() {
        let mut finals = vec!["i3".to_string(), "ao3".to_string()];
        modified_tone("你好", "l", &GLOBAL_SEGMENTER, &mut finals);
        assert_eq!(finals, vec!["i2".to_string(), "ao3".to_string()]);
    }

    #[test]
    fn merge_yi_reduplication() {
        let seg = vec![pair("听", "v"), pair("一", "m"), pair("听", "v")];
        let merged = merge_yi(seg);
        assert_eq!(merged, vec![pair("听一听", "v")]);
    }

    #[test]
    fn merge_standalone_yi_with_next() {
        let seg = vec![pair("一", "m"), pair("定", "d")];
        let merged = merge_yi(seg);
        assert_eq!(merged, vec![pair("一定", "m")]);
    }

    #[test]
    fn merge_reduplicated_tokens() {
        let seg = vec![pair("看", "v"), pair("看", "v")];
        let merged = merge_chinese_patterns(seg);
        assert_eq!(merged, vec![pair("看看", "v")]);
    }

    #[test]
    fn punctuation_not_merged() {
        let seg = vec![pair(",", "x"), pair(",", "x")];
        let merged = merge_chinese_patterns(seg);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_bu_with_next() {
        let seg = vec![pair("不", "d"), pair("怕", "v")];
        let merged = merge_chinese_patterns(seg);
        assert_eq!(merged, vec![pair("不怕", "d")]);
    }

    #[test]
    fn trailing_bu_retagged() {
        let seg = vec![pair("我", "r"), pair("不", "d")];
        let merged = merge_chinese_patterns(seg);
        assert_eq!(merged.last(), Some(&pair("不", "d")));
    }

    #[test]
    fn merge_er_suffix() {
        let seg = vec![pair("花", "n"), pair("儿", "n")];
        let merged = merge_chinese_patterns(seg);
        assert_eq!(merged, vec![pair("花儿", "n")]);
    }

    #[test]
    fn pre_merge_full_pattern() {
        let seg = vec![pair("听", "v"), pair("一", "m"), pair("听", "v")];
        let merged = pre_merge_for_modify(seg);
        assert_eq!(merged, vec![pair("听一听", "v")]);
    }
}
