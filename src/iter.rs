use crate::err::PipeErr;
use crate::key::Pair;
use crate::stage::Stage;
use tracing::debug;

/// 上游数据，源本身的读取失败也在这里体现。
pub type PairRes<V> = Result<Pair<V>, PipeErr>;

pub(crate) type Upstream<'a, V> = Box<dyn Iterator<Item = PairRes<V>> + 'a>;

/// 首次拉取时打开上游并创建阶段实例。
pub(crate) type Opener<'a, V> = Box<dyn FnOnce() -> (Upstream<'a, V>, Option<Box<dyn Stage<V> + 'a>>) + 'a>;

/// 单次遍历的状态。
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IterState {
    /// 尚未拉取过任何数据
    Unstarted,
    /// 正在从上游拉取数据
    Iterating,
    /// 上游已耗尽，正在输出`finalize`的结果
    Finalizing,
    /// 已耗尽，之后的拉取不再产生任何数据，也不再调用阶段
    Exhausted,
}

/// 流水线的单次遍历。
///
/// 驱动上游，对每个上游数据调用阶段的`execute`，把阶段输出的多个数据展开为逐个拉取；上游耗尽后恰好调用一次
/// `finalize`，其输出同样逐个交付。没有阶段时上游数据原样逐个交付。
///
/// 任何一次拉取返回错误后，本次遍历即进入[`IterState::Exhausted`]，不再产生数据。
pub struct PipelineIter<'a, V> {
    opener: Option<Opener<'a, V>>,
    inner: Option<Upstream<'a, V>>,
    stage: Option<Box<dyn Stage<V> + 'a>>,
    buffer: std::vec::IntoIter<Pair<V>>,
    finalized: bool,
    state: IterState,
    delivered: usize,
}

impl<'a, V> PipelineIter<'a, V> {
    /// 以已经打开的上游构造。
    pub(crate) fn new(inner: Upstream<'a, V>, stage: Option<Box<dyn Stage<V> + 'a>>) -> Self {
        PipelineIter {
            opener: None,
            inner: Some(inner),
            stage,
            buffer: Vec::new().into_iter(),
            finalized: false,
            state: IterState::Unstarted,
            delivered: 0,
        }
    }

    /// 上游和阶段推迟到首次拉取时才由`opener`创建，从未拉取的遍历不会消耗数据源。
    pub(crate) fn deferred(opener: Opener<'a, V>) -> Self {
        PipelineIter {
            opener: Some(opener),
            inner: None,
            stage: None,
            buffer: Vec::new().into_iter(),
            finalized: false,
            state: IterState::Unstarted,
            delivered: 0,
        }
    }

    pub fn state(&self) -> IterState {
        self.state
    }

    fn stage_name(&self) -> &'static str {
        self.stage.as_ref().map_or("none", |stage| stage.name())
    }

    fn step(&mut self) -> Result<Option<Pair<V>>, PipeErr> {
        if let Some(pair) = self.buffer.next() {
            return Ok(Some(pair));
        }
        if self.state == IterState::Iterating {
            while let Some(pair) = self.inner.as_mut().and_then(|inner| inner.next()) {
                let (key, value) = pair?;
                match self.stage.as_mut() {
                    Some(stage) => self.buffer = stage.execute(key, value)?.into_iter(),
                    None => return Ok(Some((key, value))),
                }
                // 阶段可能连续多次不输出任何数据，此时继续拉取上游
                if let Some(pair) = self.buffer.next() {
                    return Ok(Some(pair));
                }
            }
            self.state = IterState::Finalizing;
        }
        if !self.finalized {
            self.finalized = true;
            if let Some(stage) = self.stage.as_mut() {
                self.buffer = stage.finalize()?.into_iter();
                debug!(stage = stage.name(), trailing = self.buffer.len(), "stage finalized");
            }
        }
        match self.buffer.next() {
            Some(pair) => Ok(Some(pair)),
            None => {
                self.state = IterState::Exhausted;
                debug!(stage = self.stage_name(), delivered = self.delivered, "traversal exhausted");
                Ok(None)
            }
        }
    }
}

impl<V> Iterator for PipelineIter<'_, V> {
    type Item = PairRes<V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            IterState::Exhausted => return None,
            IterState::Unstarted => {
                if let Some(opener) = self.opener.take() {
                    let (inner, stage) = opener();
                    self.inner = Some(inner);
                    self.stage = stage;
                }
                debug!(stage = self.stage_name(), "traversal started");
                self.state = IterState::Iterating;
            }
            IterState::Iterating | IterState::Finalizing => {}
        }
        match self.step() {
            Ok(Some(pair)) => {
                self.delivered += 1;
                Some(Ok(pair))
            }
            Ok(None) => None,
            Err(err) => {
                debug!(stage = self.stage_name(), %err, "traversal aborted");
                self.state = IterState::Exhausted;
                self.buffer = Vec::new().into_iter();
                Some(Err(err))
            }
        }
    }
}
