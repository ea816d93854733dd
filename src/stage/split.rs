use crate::key::Key;
use crate::stage::{Stage, StageRes};

/// 按分隔符拆分值，每个部分输出为一个数据，键为`<原键>.<序号>`。分隔符为空时按字符拆分。
#[derive(Debug, Clone)]
pub struct Split {
    delimiter: String,
}

impl Split {
    pub fn new(delimiter: String) -> Self {
        Split { delimiter }
    }
}

impl Stage<String> for Split {
    fn execute(&mut self, key: Key, value: String) -> StageRes<String> {
        let parts: Vec<String> = if self.delimiter.is_empty() {
            value.chars().map(String::from).collect()
        } else {
            value.split(self.delimiter.as_str()).map(String::from).collect()
        };
        Ok(parts.into_iter().enumerate().map(|(idx, part)| (Key::String(format!("{key}.{idx}")), part)).collect())
    }

    fn name(&self) -> &'static str {
        "split"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let mut split = Split::new(",".to_string());
        assert_eq!(
            split.execute(Key::from(3), "a,b,,c".to_string()),
            Ok(vec![
                (Key::from("3.0"), "a".to_string()),
                (Key::from("3.1"), "b".to_string()),
                (Key::from("3.2"), "".to_string()),
                (Key::from("3.3"), "c".to_string()),
            ])
        );
        assert_eq!(split.execute(Key::from("k"), "abc".to_string()), Ok(vec![(Key::from("k.0"), "abc".to_string())]));
    }

    #[test]
    fn test_split_chars() {
        let mut split = Split::new(String::new());
        assert_eq!(
            split.execute(Key::from(0), "你好".to_string()),
            Ok(vec![(Key::from("0.0"), "你".to_string()), (Key::from("0.1"), "好".to_string())])
        );
        assert_eq!(split.execute(Key::from(1), String::new()), Ok(vec![]));
    }
}
