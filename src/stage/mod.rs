mod aggregate;
mod sort;
mod split;
mod uniq;

pub use aggregate::{Count, Join};
pub use sort::{Sort, SortBy};
pub use split::Split;
pub use uniq::Uniq;

use crate::err::PipeErr;
use crate::key::{Key, Pair};
use crate::Integer;
use std::cell::RefCell;
use std::rc::Rc;

/// 阶段单次调用的结果：有限、有序、已拥有所有权的数据序列。
pub type StageRes<V> = Result<Vec<Pair<V>>, PipeErr>;

/// 流水线中的一个变换阶段。
///
/// 每个输入数据按照输入顺序恰好调用一次`execute`，可以输出零个、一个或多个数据；输入耗尽后恰好调用一次`finalize`，
/// 输出依赖完整输入的尾部数据。如果遍历在耗尽前被放弃，则不会调用`finalize`。
///
/// 阶段可以持有私有的可变状态（例如计数器），该状态仅在其所属的单次遍历内共享。
pub trait Stage<V> {
    fn execute(&mut self, key: Key, value: V) -> StageRes<V>;

    fn finalize(&mut self) -> StageRes<V> {
        Ok(Vec::new())
    }

    /// 阶段名称，用于日志和错误信息。
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<V, S: Stage<V> + ?Sized> Stage<V> for Box<S> {
    fn execute(&mut self, key: Key, value: V) -> StageRes<V> {
        (**self).execute(key, value)
    }

    fn finalize(&mut self) -> StageRes<V> {
        (**self).finalize()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// 显式共享的阶段实例。
///
/// 流水线默认在每次遍历时使用全新的阶段实例；通过`Rc<RefCell<S>>`包装后，所有克隆都指向同一个实例，
/// 其内部状态会跨遍历累积。
impl<V, S: Stage<V>> Stage<V> for Rc<RefCell<S>> {
    fn execute(&mut self, key: Key, value: V) -> StageRes<V> {
        self.borrow_mut().execute(key, value)
    }

    fn finalize(&mut self) -> StageRes<V> {
        self.borrow_mut().finalize()
    }

    fn name(&self) -> &'static str {
        self.borrow().name()
    }
}

/// 可以归一化为阶段输出的回调返回值。
pub trait IntoPairs<V> {
    fn into_pairs(self) -> StageRes<V>;
}

impl<V> IntoPairs<V> for Vec<Pair<V>> {
    fn into_pairs(self) -> StageRes<V> {
        Ok(self)
    }
}

impl<V> IntoPairs<V> for (Key, V) {
    fn into_pairs(self) -> StageRes<V> {
        Ok(vec![self])
    }
}

impl<V> IntoPairs<V> for Option<(Key, V)> {
    fn into_pairs(self) -> StageRes<V> {
        Ok(self.into_iter().collect())
    }
}

impl<V> IntoPairs<V> for () {
    fn into_pairs(self) -> StageRes<V> {
        Ok(Vec::new())
    }
}

impl<V, R: IntoPairs<V>> IntoPairs<V> for Result<R, PipeErr> {
    fn into_pairs(self) -> StageRes<V> {
        self.and_then(IntoPairs::into_pairs)
    }
}

/// 将普通函数适配为阶段，`finalize`不输出任何数据。
#[derive(Clone)]
pub struct Callback<F> {
    f: F,
}

impl<F> Callback<F> {
    pub fn new(f: F) -> Self {
        Callback { f }
    }
}

impl<V, F, R> Stage<V> for Callback<F>
where
    F: FnMut(Key, V) -> R,
    R: IntoPairs<V>,
{
    fn execute(&mut self, key: Key, value: V) -> StageRes<V> {
        (self.f)(key, value).into_pairs()
    }

    fn name(&self) -> &'static str {
        "callback"
    }
}

/// 保留满足条件的数据，键值不变。
#[derive(Clone)]
pub struct Filter<P> {
    pred: P,
}

impl<P> Filter<P> {
    pub fn new(pred: P) -> Self {
        Filter { pred }
    }
}

impl<V, P: FnMut(&Key, &V) -> bool> Stage<V> for Filter<P> {
    fn execute(&mut self, key: Key, value: V) -> StageRes<V> {
        if (self.pred)(&key, &value) { Ok(vec![(key, value)]) } else { Ok(Vec::new()) }
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

/// 变换值，键不变。
#[derive(Clone)]
pub struct MapValue<F> {
    f: F,
}

impl<F> MapValue<F> {
    pub fn new(f: F) -> Self {
        MapValue { f }
    }
}

impl<V, F: FnMut(&Key, V) -> V> Stage<V> for MapValue<F> {
    fn execute(&mut self, key: Key, value: V) -> StageRes<V> {
        let value = (self.f)(&key, value);
        Ok(vec![(key, value)])
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

/// 从0开始重新编号，上游被过滤掉的键因此被压缩。
#[derive(Debug, Clone, Default)]
pub struct Renumber {
    next: Integer,
}

impl<V> Stage<V> for Renumber {
    fn execute(&mut self, _key: Key, value: V) -> StageRes<V> {
        let key = Key::Integer(self.next);
        self.next += 1;
        Ok(vec![(key, value)])
    }

    fn name(&self) -> &'static str {
        "renumber"
    }
}
