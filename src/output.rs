use crate::err::PipeErr;
use crate::pipeline::Pipeline;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 数据输出命令。输出前先收集流水线，重复的键只保留最后写入的值。
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Output {
    /// :to out     输出到标准输出，未指定输出命令时的默认输出。
    StdOut { kv: bool },
    /// :to file    输出到文件。
    File { file: String, append: bool, crlf: Option<bool>, kv: bool },
}

impl Output {
    pub(crate) fn new_std_out(kv: bool) -> Self {
        Output::StdOut { kv }
    }
    pub(crate) fn new_file(file: String, append: bool, crlf: Option<bool>, kv: bool) -> Self {
        Output::File { file, append, crlf, kv }
    }

    fn kv(&self) -> bool {
        match self {
            Output::StdOut { kv } | Output::File { kv, .. } => *kv,
        }
    }

    /// 收集并渲染为文本行，`kv`时每行为`键<TAB>值`，否则只有值。
    pub(crate) fn render(&self, pipe: &Pipeline<String>) -> Result<Vec<String>, PipeErr> {
        let map = pipe.collect()?;
        debug!(count = map.len(), "pipeline collected");
        let kv = self.kv();
        Ok(map.into_iter().map(|(key, value)| if kv { format!("{key}\t{value}") } else { value }).collect())
    }

    pub(crate) fn handle(self, pipe: &Pipeline<String>) -> Result<(), PipeErr> {
        let lines = self.render(pipe)?;
        match self {
            Output::StdOut { .. } => {
                for line in lines {
                    println!("{line}");
                }
                Ok(())
            }
            Output::File { file, append, crlf, .. } => {
                match OpenOptions::new().write(true).truncate(!append).append(append).create(true).open(&file) {
                    Ok(mut writer) => {
                        let ending = if crlf.unwrap_or(false) { "\r\n" } else { "\n" };
                        for line in lines {
                            write!(writer, "{line}{ending}").map_err(|err| PipeErr::WriteToFileErr {
                                file: file.clone(),
                                item: line.clone(),
                                err: err.to_string(),
                            })?
                        }
                        Ok(())
                    }
                    Err(err) => Err(PipeErr::OpenFileErr { file, err: err.to_string() }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    #[test]
    fn test_render_applies_collision_rule() {
        let pipe = Pipeline::from_pairs(vec![
            (Key::from("a"), "1".to_string()),
            (Key::from(0), "2".to_string()),
            (Key::from("a"), "3".to_string()),
        ]);
        assert_eq!(Output::new_std_out(false).render(&pipe), Ok(vec!["3".to_string(), "2".to_string()]));
        assert_eq!(Output::new_std_out(true).render(&pipe), Ok(vec!["a\t3".to_string(), "0\t2".to_string()]));
    }

    #[test]
    fn test_write_file() {
        let path = std::env::temp_dir().join(format!("kvp_output_{}", std::process::id()));
        let file = path.to_string_lossy().into_owned();
        let pipe = Pipeline::from_values(vec!["a".to_string(), "b".to_string()]);
        Output::new_file(file.clone(), false, Some(true), true).handle(&pipe).unwrap();
        Output::new_file(file.clone(), true, None, false).handle(&pipe).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\ta\r\n1\tb\r\na\nb\n");
        std::fs::remove_file(path).unwrap();
    }
}
