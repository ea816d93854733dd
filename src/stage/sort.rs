use crate::key::{Key, Pair};
use crate::stage::{Stage, StageRes};
use crate::Float;
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use unicase::UniCase;

#[derive(Debug, Clone, PartialEq)]
pub enum SortBy {
    /// 按照数值排序，无法解析的按照给定默认值排序，未指定时按照浮点最大值处理
    Num(Option<Float>),
    Text(bool /*nocase*/),
    Random,
}

/// 排序。所有输入在执行阶段被缓存，耗尽后一次性按序输出，键随值一起移动。
#[derive(Debug, Clone)]
pub struct Sort {
    sort_by: SortBy,
    desc: bool,
    pairs: Vec<Pair<String>>,
}

impl Sort {
    pub fn new(sort_by: SortBy, desc: bool) -> Self {
        Sort { sort_by, desc, pairs: Vec::new() }
    }
}

impl Stage<String> for Sort {
    fn execute(&mut self, key: Key, value: String) -> StageRes<String> {
        self.pairs.push((key, value));
        Ok(Vec::new())
    }

    fn finalize(&mut self) -> StageRes<String> {
        let mut pairs = std::mem::take(&mut self.pairs);
        match &self.sort_by {
            SortBy::Num(def) => {
                let def = def.unwrap_or(Float::MAX);
                let key_fn = |(_, v): &Pair<String>| OrderedFloat(v.parse::<Float>().unwrap_or(def));
                if self.desc {
                    pairs.sort_by_key(|pair| Reverse(key_fn(pair)));
                } else {
                    pairs.sort_by_key(key_fn);
                }
            }
            SortBy::Text(nocase) => match (*nocase, self.desc) {
                (true, true) => pairs.sort_by(|(_, a), (_, b)| UniCase::new(b).cmp(&UniCase::new(a))),
                (true, false) => pairs.sort_by(|(_, a), (_, b)| UniCase::new(a).cmp(&UniCase::new(b))),
                (false, true) => pairs.sort_by(|(_, a), (_, b)| b.cmp(a)),
                (false, false) => pairs.sort_by(|(_, a), (_, b)| a.cmp(b)),
            },
            SortBy::Random => pairs.shuffle(&mut rand::rng()),
        }
        Ok(pairs)
    }

    fn name(&self) -> &'static str {
        "sort"
    }
}
