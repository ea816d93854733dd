use crate::Integer;
use std::fmt::{Display, Formatter};

/// 数据的键，可以为整数或字符串。
///
/// 收集结果时键的顺序为插入顺序，与键本身的大小无关。
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Integer(Integer),
    String(String),
}

/// 在流水线中流动的最小数据单元。
pub type Pair<V> = (Key, V);

impl Key {
    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Key::Integer(i) => Some(*i),
            Key::String(_) => None,
        }
    }
}

impl From<Integer> for Key {
    fn from(i: Integer) -> Self {
        Key::Integer(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::String(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::String(s)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Integer(i) => Display::fmt(i, f),
            Key::String(s) => Display::fmt(s, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Key::from(12).to_string(), "12");
        assert_eq!(Key::from("ax").to_string(), "ax");
        assert_eq!(format!("{}x", Key::from(3)), "3x");
    }

    #[test]
    fn test_integer_and_string_keys_differ() {
        assert_ne!(Key::from(1), Key::from("1"));
        assert_eq!(Key::from(1).as_integer(), Some(1));
        assert_eq!(Key::from("1").as_integer(), None);
    }
}
