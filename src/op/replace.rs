#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReplaceArg {
    from: String, /*nocase时保存小写形式*/
    to: String,
    count: Option<usize>,
    nocase: bool,
}

impl ReplaceArg {
    pub(crate) fn new(from: String, to: String, count: Option<usize>, nocase: bool) -> Self {
        Self { from: if nocase { from.to_ascii_lowercase() } else { from }, to, count, nocase }
    }

    /// 开启全局忽略大小写
    pub(crate) fn with_nocase(self) -> Self {
        if self.nocase { self } else { ReplaceArg::new(self.from, self.to, self.count, true) }
    }

    /// 替换值中的子串，最多替换`count`次。
    ///
    /// 没有发生替换时返回`None`，调用方可以继续使用原值。
    pub(crate) fn replace(&self, text: &str) -> Option<String> {
        let max_replacements = self.count.unwrap_or(usize::MAX);
        let lower_text_holder; // 保持下方的&str引用有效
        let actual_text = if self.nocase {
            lower_text_holder = text.to_ascii_lowercase();
            &lower_text_holder as &str
        } else {
            text
        };

        let mut result = String::new();
        let mut last_end = 0;
        let mut replaced_count = 0;
        for (start, matched) in actual_text.match_indices(&self.from).take(max_replacements) {
            result.push_str(&text[last_end..start]);
            result.push_str(&self.to);
            last_end = start + matched.len();
            replaced_count += 1;
        }

        if replaced_count == 0 {
            None
        } else {
            result.push_str(&text[last_end..]);
            Some(result)
        }
    }
}
