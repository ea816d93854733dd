use crate::key::Key;
use crate::stage::{Stage, StageRes};
use crate::Integer;

/// 统计数据数量，所有输入都被消耗，耗尽后输出`(0, 数量)`。
pub struct Count<V> {
    count: Integer,
    convert: fn(Integer) -> V,
}

impl<V> Count<V> {
    pub fn new(convert: fn(Integer) -> V) -> Self {
        Count { count: 0, convert }
    }
}

impl<V: From<Integer>> Default for Count<V> {
    fn default() -> Self {
        Count::new(V::from)
    }
}

impl<V> Clone for Count<V> {
    fn clone(&self) -> Self {
        Count { count: self.count, convert: self.convert }
    }
}

impl<V> Stage<V> for Count<V> {
    fn execute(&mut self, _key: Key, _value: V) -> StageRes<V> {
        self.count += 1;
        Ok(Vec::new())
    }

    fn finalize(&mut self) -> StageRes<V> {
        Ok(vec![(Key::Integer(0), (self.convert)(self.count))])
    }

    fn name(&self) -> &'static str {
        "count"
    }
}

/// 合并数据。
///
/// 未指定分组大小时，耗尽后输出唯一的`(0, 合并结果)`，即使没有任何输入；
/// 指定分组大小时，每凑满一组立即输出，键为组序号，耗尽后输出剩余不足一组的数据。
#[derive(Debug, Clone)]
pub struct Join {
    delimiter: String,
    batch: Option<usize>,
    chunk: Vec<String>,
    next_key: Integer,
}

impl Join {
    pub fn new(delimiter: String, batch: Option<usize>) -> Self {
        Join { delimiter, batch: batch.filter(|b| *b > 0), chunk: Vec::new(), next_key: 0 }
    }

    fn flush(&mut self) -> (Key, String) {
        let key = Key::Integer(self.next_key);
        self.next_key += 1;
        let joined = self.chunk.join(&self.delimiter);
        self.chunk.clear();
        (key, joined)
    }
}

impl Stage<String> for Join {
    fn execute(&mut self, _key: Key, value: String) -> StageRes<String> {
        self.chunk.push(value);
        match self.batch {
            Some(batch) if self.chunk.len() >= batch => Ok(vec![self.flush()]),
            _ => Ok(Vec::new()),
        }
    }

    fn finalize(&mut self) -> StageRes<String> {
        if self.batch.is_none() || !self.chunk.is_empty() { Ok(vec![self.flush()]) } else { Ok(Vec::new()) }
    }

    fn name(&self) -> &'static str {
        "join"
    }
}
