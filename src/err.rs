use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipeErr {
    #[error("[Invalid Stage] `{name}` is neither a known stage nor a callable")]
    InvalidStage { name: String },

    #[error("[Stage Err] Stage `{stage}` failed: {error}")]
    StageErr { stage: &'static str, error: String },

    #[error("[Token Parse Err] {0}")]
    ParseTokenErr(String),

    #[error("[Arg Parse Err] Unable to parse `{arg_value}` in argument `{arg}` of cmd `{cmd}`, error: {error}")]
    ArgParseErr { cmd: &'static str, arg: &'static str, arg_value: String, error: String },

    #[error("[Bad Arg] Bad value `{arg_value}` in argument `{arg}` of cmd `{cmd}`")]
    BadArg { cmd: &'static str, arg: &'static str, arg_value: String },

    #[error("[Missing Arg] Missing argument `{arg}` of cmd `{cmd}`")]
    MissingArg { cmd: &'static str, arg: &'static str },

    #[error("[Bad Arg] Unknown arguments: {args:?}")]
    UnknownArgs { args: Vec<String> },

    #[error("[Parse Num Err] `{0}` is not a finite number")]
    ParseNumErr(String),

    #[error("[Regex Err] Invalid regex `{reg}`: {err}")]
    ParseRegexErr { reg: String, err: String },

    #[error("[Format Err] Unable to format {value} with {fmt} at position {err_pos}")]
    FormatStringErr { fmt: String, value: String, err_pos: usize },

    #[error("[File Err] Unable to open file `{file}`: {err}")]
    OpenFileErr { file: String, err: String },

    #[error("[File Err] Unable to read file `{file}`: {err}")]
    ReadFileErr { file: String, err: String },

    #[error("[StdIn Err] Unable to read from stdin: {0}")]
    ReadStdInErr(String),

    #[error("[File Err] Unable to write `{item}` to file `{file}`: {err}")]
    WriteToFileErr { file: String, item: String, err: String },
}

impl PipeErr {
    /// 进程退出码
    pub fn code(&self) -> i32 {
        match self {
            PipeErr::InvalidStage { .. } => 10,
            PipeErr::StageErr { .. } => 11,
            PipeErr::ParseTokenErr(_) => 20,
            PipeErr::ArgParseErr { .. } => 21,
            PipeErr::BadArg { .. } => 22,
            PipeErr::MissingArg { .. } => 24,
            PipeErr::UnknownArgs { .. } => 25,
            PipeErr::ParseNumErr(_) => 26,
            PipeErr::ParseRegexErr { .. } => 27,
            PipeErr::FormatStringErr { .. } => 28,
            PipeErr::OpenFileErr { .. } => 30,
            PipeErr::ReadFileErr { .. } => 31,
            PipeErr::ReadStdInErr(_) => 32,
            PipeErr::WriteToFileErr { .. } => 33,
        }
    }

    /// 退出码及其说明，用于帮助信息
    pub(crate) fn all_codes() -> &'static [(i32, &'static str)] {
        &[
            (10, "操作命令无法识别为阶段。"),
            (11, "阶段执行失败。"),
            (20, "解析命令文本失败。"),
            (21, "解析参数失败。"),
            (22, "参数值无效。"),
            (24, "缺少必选参数。"),
            (25, "存在未知参数。"),
            (26, "无法解析为数值。"),
            (27, "正则表达式无效。"),
            (28, "格式化字符串失败。"),
            (30, "打开文件失败。"),
            (31, "读取文件失败。"),
            (32, "读取标准输入失败。"),
            (33, "写入文件失败。"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_documented() {
        let errs = vec![
            PipeErr::InvalidStage { name: ":foo".to_string() },
            PipeErr::StageErr { stage: "fmt", error: "oops".to_string() },
            PipeErr::MissingArg { cmd: ":take", arg: "condition" },
            PipeErr::WriteToFileErr { file: "a".to_string(), item: "b".to_string(), err: "c".to_string() },
        ];
        for err in errs {
            assert!(PipeErr::all_codes().iter().any(|(code, _)| *code == err.code()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PipeErr::InvalidStage { name: ":foo".to_string() }.to_string(),
            "[Invalid Stage] `:foo` is neither a known stage nor a callable"
        );
        assert_eq!(
            PipeErr::MissingArg { cmd: ":take", arg: "condition" }.to_string(),
            "[Missing Arg] Missing argument `condition` of cmd `:take`"
        );
    }
}
