mod replace;

use crate::condition::Condition;
use crate::config::{is_nocase, Config};
use crate::err::PipeErr;
use crate::fmt::fmt_pair;
use crate::key::{Key, Pair};
use crate::op::replace::ReplaceArg;
use crate::pipeline::Pipeline;
use crate::stage::{Count, Join, Sort, SortBy, Split, Uniq};
use crate::PipeRes;

/// 操作命令，每个命令在流水线末尾追加一个阶段。
#[derive(Debug, PartialEq)]
pub(crate) enum Op {
    /* **************************************** 选择 **************************************** */
    /// :take       保留满足条件的数据。
    /// :drop       丢弃满足条件的数据。
    TakeDrop { take: bool, cond: Condition },
    /* **************************************** 转换 **************************************** */
    /// :upper      转为ASCII大写。
    /// :lower      转为ASCII小写。
    Case { upper: bool },
    /// :replace    替换子串。
    Replace(ReplaceArg),
    /// :fmt        按照格式字符串格式化，可以引用`{key}`和`{value}`。
    Fmt(String),
    /// :split      按照分隔符拆分为多个数据。
    Split(String),
    /* **************************************** 减少 **************************************** */
    /// :uniq       去重。
    Uniq(bool /*nocase*/),
    /// :join       合并数据。
    Join { delimiter: String, batch: Option<usize> },
    /// :count      统计数据数量。
    Count,
    /* **************************************** 调整位置 **************************************** */
    /// :sort       排序。
    Sort { sort_by: SortBy, desc: bool },
    /// :renumber   从0开始重新编号。
    Renumber,
}

impl Op {
    pub(crate) fn new_replace(from: String, to: String, count: Option<usize>, nocase: bool) -> Op {
        Op::Replace(ReplaceArg::new(from, to, count, nocase))
    }
    pub(crate) fn new_take_drop(take: bool, cond: Condition) -> Op {
        Op::TakeDrop { take, cond }
    }
    pub(crate) fn new_join(delimiter: String, batch: Option<usize>) -> Op {
        Op::Join { delimiter, batch }
    }
    pub(crate) fn new_sort(sort_by: SortBy, desc: bool) -> Op {
        Op::Sort { sort_by, desc }
    }

    /// 以当前操作包装流水线，全局配置在此时生效。
    pub(crate) fn wrap(self, pipe: Pipeline<String>, configs: &[Config]) -> PipeRes {
        match self {
            Op::TakeDrop { take, cond } => Ok(pipe.filter(move |key, value| cond.test(key, value) == take)),
            Op::Case { upper } => Ok(pipe.map(move |_, mut value| {
                if upper {
                    value.make_ascii_uppercase()
                } else {
                    value.make_ascii_lowercase()
                }
                value
            })),
            Op::Replace(replace_arg) => {
                let replace_arg = if is_nocase(false, configs) { replace_arg.with_nocase() } else { replace_arg };
                Ok(pipe.map(move |_, value| replace_arg.replace(&value).unwrap_or(value)))
            }
            Op::Fmt(fmt) => Ok(pipe.pipe_fn(move |key: Key, value: String| -> Result<Pair<String>, PipeErr> {
                match fmt_pair(&fmt, &key, &value) {
                    Ok(formatted) => Ok((key, formatted)),
                    Err(err) => Err(PipeErr::StageErr { stage: "fmt", error: err.to_string() }),
                }
            })),
            Op::Split(delimiter) => Ok(pipe.pipe(Split::new(delimiter))),
            Op::Uniq(nocase) => Ok(pipe.pipe(Uniq::new(is_nocase(nocase, configs)))),
            Op::Join { delimiter, batch } => match batch {
                Some(0) => Err(PipeErr::BadArg { cmd: ":join", arg: "batch", arg_value: "0".to_owned() }),
                _ => Ok(pipe.pipe(Join::new(delimiter, batch))),
            },
            Op::Count => Ok(pipe.pipe(Count::new(|count| count.to_string()))),
            Op::Sort { sort_by, desc } => {
                let sort_by = match sort_by {
                    SortBy::Text(nocase) => SortBy::Text(is_nocase(nocase, configs)),
                    other => other,
                };
                Ok(pipe.pipe(Sort::new(sort_by, desc)))
            }
            Op::Renumber => Ok(pipe.renumber()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Select, TextSelectMode};

    fn run(values: Vec<&str>, ops: Vec<Op>, configs: &[Config]) -> Vec<(Key, String)> {
        let mut pipe = Pipeline::from_values(values.into_iter().map(String::from).collect::<Vec<_>>());
        for op in ops {
            pipe = op.wrap(pipe, configs).unwrap();
        }
        pipe.collect().unwrap().into_vec()
    }

    fn values(pairs: Vec<(Key, String)>) -> Vec<String> {
        pairs.into_iter().map(|(_, v)| v).collect()
    }

    #[test]
    fn test_take_drop_keep_keys() {
        let cond = || Condition::new(Select::Text { mode: TextSelectMode::Empty }, false);
        assert_eq!(
            run(vec!["a", "", "b"], vec![Op::new_take_drop(false, cond())], &[]),
            vec![(Key::from(0), "a".to_string()), (Key::from(2), "b".to_string())]
        );
        assert_eq!(run(vec!["a", "", "b"], vec![Op::new_take_drop(true, cond())], &[]), vec![(Key::from(1), "".to_string())]);
    }

    #[test]
    fn test_case() {
        assert_eq!(values(run(vec!["aBc你"], vec![Op::Case { upper: true }], &[])), vec!["ABC你"]);
        assert_eq!(values(run(vec!["aBc你"], vec![Op::Case { upper: false }], &[])), vec!["abc你"]);
    }

    #[test]
    fn test_replace_with_global_nocase() {
        let op = || Op::new_replace("A".to_owned(), "x".to_owned(), None, false);
        assert_eq!(values(run(vec!["aAa"], vec![op()], &[])), vec!["axa"]);
        assert_eq!(values(run(vec!["aAa"], vec![op()], &[Config::Nocase])), vec!["xxx"]);
    }

    #[test]
    fn test_fmt() {
        assert_eq!(
            values(run(vec!["a", "b"], vec![Op::Fmt("{key}:{value}".to_owned())], &[])),
            vec!["0:a", "1:b"]
        );
        let pipe = Op::Fmt("{nothing}".to_owned()).wrap(Pipeline::from_values(vec!["a".to_string()]), &[]).unwrap();
        assert!(matches!(pipe.collect(), Err(PipeErr::StageErr { stage: "fmt", .. })));
    }

    #[test]
    fn test_split_then_renumber() {
        assert_eq!(
            run(vec!["a,b", "c"], vec![Op::Split(",".to_owned()), Op::Renumber], &[]),
            vec![(Key::from(0), "a".to_string()), (Key::from(1), "b".to_string()), (Key::from(2), "c".to_string())]
        );
    }

    #[test]
    fn test_uniq_with_global_nocase() {
        assert_eq!(values(run(vec!["a", "A", "a"], vec![Op::Uniq(false)], &[])), vec!["a", "A"]);
        assert_eq!(values(run(vec!["a", "A", "a"], vec![Op::Uniq(false)], &[Config::Nocase])), vec!["a"]);
    }

    #[test]
    fn test_join() {
        assert_eq!(values(run(vec!["a", "b", "c"], vec![Op::new_join(",".to_owned(), None)], &[])), vec!["a,b,c"]);
        assert_eq!(values(run(vec!["a", "b", "c"], vec![Op::new_join(",".to_owned(), Some(2))], &[])), vec!["a,b", "c"]);
        let res = Op::new_join(",".to_owned(), Some(0)).wrap(Pipeline::from_values(Vec::<String>::new()), &[]);
        assert!(matches!(res, Err(PipeErr::BadArg { .. })));
    }

    #[test]
    fn test_count() {
        assert_eq!(run(vec!["a", "b", "c"], vec![Op::Count], &[]), vec![(Key::from(0), "3".to_string())]);
        assert_eq!(run(vec![], vec![Op::Count], &[]), vec![(Key::from(0), "0".to_string())]);
    }

    #[test]
    fn test_sort() {
        assert_eq!(
            values(run(vec!["10", "9", "x", "-1"], vec![Op::new_sort(SortBy::Num(None), false)], &[])),
            vec!["-1", "9", "10", "x"]
        );
        assert_eq!(
            values(run(vec!["b", "A", "a"], vec![Op::new_sort(SortBy::Text(false), false)], &[Config::Nocase])),
            vec!["A", "a", "b"]
        );
        assert_eq!(
            values(run(vec!["b", "c", "a"], vec![Op::new_sort(SortBy::Text(false), true)], &[])),
            vec!["c", "b", "a"]
        );
    }
}
