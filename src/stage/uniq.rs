use crate::key::Key;
use crate::stage::{Stage, StageRes};
use std::collections::HashSet;
use unicase::UniCase;

/// 去重，保留每个值首次出现的数据及其键。
#[derive(Debug, Clone)]
pub enum Uniq {
    Exact(HashSet<String>),
    Nocase(HashSet<UniCase<String>>),
}

impl Uniq {
    pub fn new(nocase: bool) -> Self {
        if nocase { Uniq::Nocase(HashSet::new()) } else { Uniq::Exact(HashSet::new()) }
    }

    fn first_seen(&mut self, value: &str) -> bool {
        match self {
            Uniq::Exact(seen) => seen.insert(value.to_owned()),
            Uniq::Nocase(seen) => seen.insert(UniCase::new(value.to_owned())),
        }
    }
}

impl Stage<String> for Uniq {
    fn execute(&mut self, key: Key, value: String) -> StageRes<String> {
        if self.first_seen(&value) { Ok(vec![(key, value)]) } else { Ok(Vec::new()) }
    }

    fn name(&self) -> &'static str {
        "uniq"
    }
}
