use crate::err::PipeErr;
use crate::key::Key;
use crate::{Float, Integer, Num};
use regex::Regex;

/// 条件，由选择方式和可选的否定组成
#[derive(Debug, Clone)]
pub(crate) struct Condition {
    select: Select,
    not: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum Select {
    /// 按照字符串长度范围选择，范围两端都包含
    TextLenRange { min: Option<usize>, max: Option<usize> },
    /// 按照字符串特定长度选择
    TextLenSpec { spec: usize },
    /// 按照数值范围选择，无法解析为数时不选择
    NumRange { min: Option<Num>, max: Option<Num> },
    /// 按照特定数值选择，无法解析为数时不选择
    NumSpec { spec: Num },
    /// 选择整数（`Some(true)`）、浮点数（`Some(false)`）或任意数值
    Num { integer: Option<bool> },
    /// 按照整数键的范围选择，字符串键不选择
    KeyRange { min: Option<Integer>, max: Option<Integer> },
    Text { mode: TextSelectMode },
    RegMatch(Regex),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum TextSelectMode {
    Upper,
    Lower,
    Empty,
    Blank,
}

impl PartialEq for Select {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Select::TextLenRange { min: l0, max: l1 }, Select::TextLenRange { min: r0, max: r1 }) => {
                l0 == r0 && l1 == r1
            }
            (Select::TextLenSpec { spec: l }, Select::TextLenSpec { spec: r }) => l == r,
            (Select::NumRange { min: l0, max: l1 }, Select::NumRange { min: r0, max: r1 }) => l0 == r0 && l1 == r1,
            (Select::NumSpec { spec: l }, Select::NumSpec { spec: r }) => l == r,
            (Select::Num { integer: l }, Select::Num { integer: r }) => l == r,
            (Select::KeyRange { min: l0, max: l1 }, Select::KeyRange { min: r0, max: r1 }) => l0 == r0 && l1 == r1,
            (Select::Text { mode: l }, Select::Text { mode: r }) => l == r,
            // Regex 比较模式字符串
            (Select::RegMatch(l), Select::RegMatch(r)) => l.as_str() == r.as_str(),
            _ => false,
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.not == other.not && self.select == other.select
    }
}

#[inline]
fn in_range<T: PartialOrd>(value: T, min: &Option<T>, max: &Option<T>) -> bool {
    min.as_ref().is_none_or(|min| &value >= min) && max.as_ref().is_none_or(|max| &value <= max)
}

impl Select {
    /// 整个值必须完整匹配正则表达式
    pub(crate) fn new_reg_match(regex: &str) -> Result<Select, PipeErr> {
        let reg = format!(r"\A(?:{})\z", regex);
        Regex::new(&reg).map(Select::RegMatch).map_err(|err| PipeErr::ParseRegexErr { reg, err: err.to_string() })
    }

    fn test(&self, key: &Key, value: &str) -> bool {
        match self {
            Select::TextLenRange { min, max } => in_range(value.chars().count(), min, max),
            Select::TextLenSpec { spec } => value.chars().count() == *spec,
            Select::NumRange { min, max } => value.parse::<Num>().is_ok_and(|num| in_range(num, min, max)),
            Select::NumSpec { spec } => value.parse::<Num>().is_ok_and(|num| &num == spec),
            Select::Num { integer } => match integer {
                Some(true) => value.parse::<Integer>().is_ok(),
                Some(false) => value.parse::<Integer>().is_err() && value.parse::<Float>().is_ok_and(Float::is_finite),
                None => value.parse::<Num>().is_ok(),
            },
            Select::KeyRange { min, max } => key.as_integer().is_some_and(|k| in_range(k, min, max)),
            Select::Text { mode } => match mode {
                TextSelectMode::Upper => !value.chars().any(char::is_lowercase),
                TextSelectMode::Lower => !value.chars().any(char::is_uppercase),
                TextSelectMode::Empty => value.is_empty(),
                TextSelectMode::Blank => value.chars().all(char::is_whitespace),
            },
            Select::RegMatch(regex) => regex.is_match(value),
        }
    }
}

impl Condition {
    pub(crate) fn new(select: Select, not: bool) -> Condition {
        Condition { select, not }
    }

    pub(crate) fn test(&self, key: &Key, value: &str) -> bool {
        let res = self.select.test(key, value);
        if self.not { !res } else { res }
    }
}
