use crate::collect::PairMap;
use crate::err::PipeErr;
use crate::iter::{PairRes, PipelineIter, Upstream};
use crate::key::{Key, Pair};
use crate::stage::{Callback, Count, Filter, IntoPairs, MapValue, Renumber, Stage};
use crate::Integer;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use tracing::warn;

/// 流水线的数据源。每次遍历都会调用`open`，从头开始产生有限、有序的数据。
pub trait Source<V> {
    fn open(&self) -> Box<dyn Iterator<Item = PairRes<V>> + '_>;
}

impl<V: Clone> Source<V> for Vec<Pair<V>> {
    fn open(&self) -> Box<dyn Iterator<Item = PairRes<V>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}

/// 每次遍历都重新调用函数构造上游，因此可以重复遍历。
pub struct FnSource<F>(pub F);

impl<V, F, I> Source<V> for FnSource<F>
where
    F: Fn() -> I,
    I: IntoIterator<Item = PairRes<V>>,
    I::IntoIter: 'static,
{
    fn open(&self) -> Box<dyn Iterator<Item = PairRes<V>> + '_> {
        Box::new((self.0)().into_iter())
    }
}

/// 只能遍历一次的外部数据，之后的遍历不产生任何数据。
pub struct OnceSource<I>(RefCell<Option<I>>);

impl<I> OnceSource<I> {
    pub fn new(iter: I) -> Self {
        OnceSource(RefCell::new(Some(iter)))
    }
}

impl<V, I> Source<V> for OnceSource<I>
where
    V: 'static,
    I: Iterator<Item = PairRes<V>> + 'static,
{
    fn open(&self) -> Box<dyn Iterator<Item = PairRes<V>> + '_> {
        match self.0.borrow_mut().take() {
            Some(iter) => Box::new(iter),
            None => {
                warn!("one-shot source has already been consumed, yielding nothing");
                Box::new(std::iter::empty())
            }
        }
    }
}

type StageFactory<V> = Box<dyn Fn() -> Box<dyn Stage<V>>>;

enum Node<V> {
    Source(Box<dyn Source<V>>),
    Piped { inner: Box<Pipeline<V>>, factory: StageFactory<V>, name: &'static str },
}

/// 不可变、可链式组合的流水线。
///
/// 构造时不做任何计算；每次遍历（[`Pipeline::iter`]、[`Pipeline::collect`]）都会从头打开数据源，并为每一级
/// 创建全新的阶段实例，因此阶段的私有状态不会在遍历之间泄漏。
///
/// ```
/// use kvpipe::{Key, Pipeline};
///
/// let res = Pipeline::from_values(vec![11, 12, 13, 14])
///     .filter(|_, v| v % 2 == 0)
///     .map(|_, v| v / 2)
///     .collect()
///     .unwrap();
/// assert_eq!(res.into_vec(), vec![(Key::from(1), 6), (Key::from(3), 7)]);
/// ```
pub struct Pipeline<V> {
    node: Node<V>,
}

impl<V: 'static> Pipeline<V> {
    /// 直接以数据源构造，不经过任何阶段。
    pub fn from_source(source: impl Source<V> + 'static) -> Self {
        Pipeline { node: Node::Source(Box::new(source)) }
    }

    pub fn from_pairs(pairs: Vec<Pair<V>>) -> Self
    where
        V: Clone,
    {
        Self::from_source(pairs)
    }

    /// 以值构造，键为从0开始的序号。
    pub fn from_values(values: impl IntoIterator<Item = V>) -> Self
    where
        V: Clone,
    {
        Self::from_pairs(values.into_iter().enumerate().map(|(idx, v)| (Key::Integer(idx as Integer), v)).collect())
    }

    /// 每次遍历都调用`f`重新构造上游。
    pub fn from_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = Pair<V>>,
        I::IntoIter: 'static,
    {
        Self::from_source(FnSource(move || f().into_iter().map(Ok)))
    }

    /// 同[`Pipeline::from_fn`]，上游数据可以携带读取错误。
    pub fn from_fallible_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = PairRes<V>>,
        I::IntoIter: 'static,
    {
        Self::from_source(FnSource(f))
    }

    /// 以只能遍历一次的外部数据构造，第二次遍历不产生任何数据。
    pub fn from_once<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = PairRes<V>>,
        I::IntoIter: 'static,
    {
        Self::from_source(OnceSource::new(iter.into_iter()))
    }

    /// 追加一个阶段。每次遍历使用`stage`的一个克隆，原始实例保持不变。
    ///
    /// 需要在遍历之间共享状态时，显式传入`Rc<RefCell<S>>`。
    pub fn pipe<S: Stage<V> + Clone + 'static>(self, stage: S) -> Self {
        let name = stage.name();
        self.pipe_factory(name, Box::new(move || -> Box<dyn Stage<V>> { Box::new(stage.clone()) }))
    }

    /// 追加一个阶段，每次遍历调用`factory`创建新的实例。
    ///
    /// 构造时不调用`factory`，因此需要显式给出阶段名称。
    pub fn pipe_with<S, F>(self, name: &'static str, factory: F) -> Self
    where
        S: Stage<V> + 'static,
        F: Fn() -> S + 'static,
    {
        self.pipe_factory(name, Box::new(move || -> Box<dyn Stage<V>> { Box::new(factory()) }))
    }

    /// 以普通函数作为阶段，返回值可以为多个、单个、可选、空或者携带错误的数据。
    pub fn pipe_fn<F, R>(self, f: F) -> Self
    where
        F: FnMut(Key, V) -> R + Clone + 'static,
        R: IntoPairs<V>,
    {
        self.pipe(Callback::new(f))
    }

    fn pipe_factory(self, name: &'static str, factory: StageFactory<V>) -> Self {
        Pipeline { node: Node::Piped { inner: Box::new(self), factory, name } }
    }

    /// 保留满足条件的数据，键不变。
    pub fn filter<P>(self, pred: P) -> Self
    where
        P: FnMut(&Key, &V) -> bool + Clone + 'static,
    {
        self.pipe(Filter::new(pred))
    }

    /// 变换值，键不变。
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnMut(&Key, V) -> V + Clone + 'static,
    {
        self.pipe(MapValue::new(f))
    }

    /// 从0开始重新编号。
    pub fn renumber(self) -> Self {
        self.pipe(Renumber::default())
    }

    /// 统计数量，结果为唯一的`(0, 数量)`。
    pub fn count(self) -> Self
    where
        V: From<Integer>,
    {
        self.pipe(Count::default())
    }

    /// 创建一次全新的遍历。数据源和阶段实例在首次拉取时才打开和创建。
    pub fn iter(&self) -> PipelineIter<'_, V> {
        PipelineIter::deferred(Box::new(move || self.open()))
    }

    fn open(&self) -> (Upstream<'_, V>, Option<Box<dyn Stage<V> + '_>>) {
        match &self.node {
            Node::Source(source) => (source.open(), None),
            Node::Piped { inner, factory, .. } => (Box::new(inner.iter()), Some(factory())),
        }
    }

    /// 遍历至耗尽并按交付顺序写入映射，重复的键保留首次出现的位置和最后写入的值。
    pub fn collect(&self) -> Result<PairMap<V>, PipeErr> {
        self.iter().collect()
    }

    /// 从数据源开始依次列出各级阶段名称。
    pub fn stage_names(&self) -> Vec<&'static str> {
        match &self.node {
            Node::Source(_) => Vec::new(),
            Node::Piped { inner, name, .. } => {
                let mut names = inner.stage_names();
                names.push(*name);
                names
            }
        }
    }
}

impl<'a, V: 'static> IntoIterator for &'a Pipeline<V> {
    type Item = PairRes<V>;
    type IntoIter = PipelineIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Clone + 'static> FromIterator<Pair<V>> for Pipeline<V> {
    fn from_iter<T: IntoIterator<Item = Pair<V>>>(iter: T) -> Self {
        Pipeline::from_pairs(iter.into_iter().collect())
    }
}

impl<V: 'static> Debug for Pipeline<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stage_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::IterState;
    use crate::stage::StageRes;
    use std::cell::Cell;
    use std::rc::Rc;

    fn pairs<V: Clone>(expected: &[(i64, V)]) -> Vec<Pair<V>> {
        expected.iter().map(|(k, v)| (Key::from(*k), v.clone())).collect()
    }

    /// 每个数据输出自身及`(<key>x, value + 1)`
    #[derive(Clone)]
    struct AddOne;

    impl Stage<i64> for AddOne {
        fn execute(&mut self, key: Key, value: i64) -> StageRes<i64> {
            let expanded = Key::String(format!("{key}x"));
            Ok(vec![(key, value), (expanded, value + 1)])
        }
    }

    /// 只在耗尽后输出数量
    #[derive(Clone, Default)]
    struct Counter {
        count: i64,
    }

    impl Stage<i64> for Counter {
        fn execute(&mut self, _key: Key, _value: i64) -> StageRes<i64> {
            self.count += 1;
            Ok(vec![])
        }

        fn finalize(&mut self) -> StageRes<i64> {
            Ok(vec![(Key::from(0), self.count)])
        }
    }

    #[test]
    fn test_without_pipes() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 11), (1, 12), (2, 13)]));
        assert!(pipe.stage_names().is_empty());
    }

    #[test]
    fn test_with_counter() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]).pipe(Counter::default());
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 3)]));
    }

    #[test]
    fn test_callback() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]).pipe_fn(|k, v| vec![(k, v * 2)]);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 22), (1, 24), (2, 26)]));
    }

    #[test]
    fn test_with_add_one() {
        let pipe = Pipeline::from_pairs(vec![(Key::from("a"), 11), (Key::from("b"), 21), (Key::from("c"), 31)])
            .pipe(AddOne);
        let res = pipe.collect().unwrap();
        assert_eq!(
            res.into_vec(),
            vec![
                (Key::from("a"), 11),
                (Key::from("ax"), 12),
                (Key::from("b"), 21),
                (Key::from("bx"), 22),
                (Key::from("c"), 31),
                (Key::from("cx"), 32),
            ]
        );
    }

    #[test]
    fn test_with_two_stages() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]).pipe(AddOne).pipe(Counter::default());
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 6)]));
    }

    #[test]
    fn test_filter() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]).filter(|_, v| v % 2 == 0);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(1, 12)]));
    }

    #[test]
    fn test_map() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]).map(|_, v| v * 2);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 22), (1, 24), (2, 26)]));
    }

    #[test]
    fn test_filter_and_map() {
        let pipe = Pipeline::from_values(vec![11, 12, 13, 14]).filter(|_, v| v % 2 == 0).map(|_, v| v / 2);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(1, 6), (3, 7)]));
    }

    #[test]
    fn test_renumber() {
        let pipe = Pipeline::from_values(vec![11, 12, 13, 14]).filter(|_, v| v % 2 == 0).renumber();
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 12), (1, 14)]));
        assert_eq!(pipe.stage_names(), vec!["filter", "renumber"]);
    }

    #[test]
    fn test_count_builder() {
        let pipe = Pipeline::from_values(vec![1i64, 2, 3, 4]).filter(|_, v| *v > 1).count();
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 3)]));
    }

    #[test]
    fn test_colliding_keys_keep_first_position() {
        let pipe = Pipeline::from_values(vec![1, 2, 3]).pipe_fn(|k: Key, v| {
            let key = if v == 3 { Key::from(0) } else { k };
            (key, v * 10)
        });
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 30), (1, 20)]));
        // 遍历本身仍然交付全部数据
        assert_eq!(pipe.iter().count(), 3);
    }

    #[test]
    fn test_repeated_traversals_are_identical() {
        let pipe = Pipeline::from_values(vec![11, 12, 13]);
        assert_eq!(pipe.collect(), pipe.collect());

        let counted = Pipeline::from_fn(|| (0..3).map(|i| (Key::from(i), i))).pipe(Counter::default());
        assert_eq!(counted.collect().unwrap().into_vec(), pairs(&[(0, 3)]));
        assert_eq!(counted.collect().unwrap().into_vec(), pairs(&[(0, 3)]));
    }

    #[test]
    fn test_fresh_stage_per_traversal() {
        let created = Rc::new(Cell::new(0));
        let counter = created.clone();
        let pipe = Pipeline::from_values(vec![5, 6]).pipe_with("renumber", move || {
            counter.set(counter.get() + 1);
            Renumber::default()
        });
        assert_eq!(created.get(), 0);
        assert_eq!(pipe.stage_names(), vec!["renumber"]);
        // 未拉取的遍历不创建阶段实例
        drop(pipe.iter());
        assert_eq!(created.get(), 0);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 5), (1, 6)]));
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 5), (1, 6)]));
        assert_eq!(created.get(), 2);
    }

    #[test]
    fn test_shared_stage_leaks_between_traversals() {
        let shared = Rc::new(RefCell::new(Renumber::default()));
        let pipe = Pipeline::from_values(vec![5, 6]).pipe(shared);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 5), (1, 6)]));
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(2, 5), (3, 6)]));
    }

    #[test]
    fn test_once_source() {
        let pipe = Pipeline::from_once(vec![Ok((Key::from(0), 1i64)), Ok((Key::from(1), 2))]).count();
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 2)]));
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 0)]));
    }

    #[test]
    fn test_unpulled_traversal_keeps_once_source() {
        let pipe = Pipeline::from_once(vec![Ok((Key::from(0), 1i64)), Ok((Key::from(1), 2))]);
        let iter = pipe.iter();
        assert_eq!(iter.state(), IterState::Unstarted);
        drop(iter);
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 1), (1, 2)]));
        assert!(pipe.collect().unwrap().is_empty());
    }

    #[test]
    fn test_stage_error_surfaces_at_offending_pair() {
        let pipe = Pipeline::from_values(vec![1, 2, 3]).pipe_fn(|k, v| {
            if v == 2 { Err(PipeErr::StageErr { stage: "test", error: "two".to_string() }) } else { Ok((k, v)) }
        });
        let mut iter = pipe.iter();
        assert_eq!(iter.next(), Some(Ok((Key::from(0), 1))));
        assert!(matches!(iter.next(), Some(Err(PipeErr::StageErr { .. }))));
        assert_eq!(iter.next(), None);
        assert_eq!(pipe.collect(), Err(PipeErr::StageErr { stage: "test", error: "two".to_string() }));
    }

    #[test]
    fn test_for_loop_and_from_iterator() {
        let pipe: Pipeline<&str> = vec![(Key::from("x"), "a"), (Key::from("y"), "b")].into_iter().collect();
        let mut seen = Vec::new();
        for pair in &pipe {
            seen.push(pair.unwrap());
        }
        assert_eq!(seen, vec![(Key::from("x"), "a"), (Key::from("y"), "b")]);
    }

    #[test]
    fn test_deep_chain() {
        let pipe = (0..50).fold(Pipeline::from_values(vec![0i64]), |pipe, _| pipe.map(|_, v| v + 1));
        assert_eq!(pipe.collect().unwrap().into_vec(), pairs(&[(0, 50)]));
        assert_eq!(pipe.stage_names().len(), 50);
    }
}
