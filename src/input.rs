use crate::err::PipeErr;
use crate::iter::PairRes;
use crate::key::Key;
use crate::pipeline::Pipeline;
use crate::Integer;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};

/// 数据输入命令，键为从0开始的行序号。
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Input {
    /// 标准输入：`kvp in`，只能遍历一次
    StdIn,
    /// 外部文件，每次遍历都重新读取
    File { files: Vec<String> },
    /// 直接字面值
    Of { values: Vec<String> },
}

impl Input {
    pub(crate) fn new_std_in() -> Input {
        Input::StdIn
    }
    pub(crate) fn new_file(files: Vec<String>) -> Input {
        Input::File { files }
    }
    pub(crate) fn new_of(values: Vec<String>) -> Input {
        Input::Of { values }
    }

    pub(crate) fn into_pipeline(self) -> Pipeline<String> {
        match self {
            Input::StdIn => Pipeline::from_once(io::stdin().lines().enumerate().map(|(idx, line)| {
                line.map(|line| (Key::Integer(idx as Integer), line))
                    .map_err(|err| PipeErr::ReadStdInErr(err.to_string()))
            })),
            Input::File { files } => Pipeline::from_fallible_fn(move || read_files(&files)),
            Input::Of { values } => Pipeline::from_values(values),
        }
    }
}

/// 依次读取所有文件的行，行序号跨文件连续。文件在首次拉取时才打开。
fn read_files(files: &[String]) -> Box<dyn Iterator<Item = PairRes<String>>> {
    Box::new(
        files
            .to_vec()
            .into_iter()
            .flat_map(|file| -> Box<dyn Iterator<Item = Result<String, PipeErr>>> {
                match File::open(&file) {
                    Ok(reader) => Box::new(BufReader::new(reader).lines().map(move |line| {
                        line.map_err(|err| PipeErr::ReadFileErr { file: file.clone(), err: err.to_string() })
                    })),
                    Err(err) => Box::new(std::iter::once(Err(PipeErr::OpenFileErr { file, err: err.to_string() }))),
                }
            })
            .enumerate()
            .map(|(idx, line)| line.map(|line| (Key::Integer(idx as Integer), line))),
    )
}
