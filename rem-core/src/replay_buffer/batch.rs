//! Batch types stored in and sampled from [`SimpleReplayBuffer`](super::SimpleReplayBuffer).
use crate::TransitionBatch;

/// Column storage of observations or actions.
///
/// A [`SimpleReplayBuffer`](super::SimpleReplayBuffer) keeps one value of this type
/// per column and addresses items by slot index.
pub trait BatchBase {
    /// Creates an empty storage that will hold at most `capacity` items.
    fn new(capacity: usize) -> Self;

    /// Writes the single item of `data` at slot `ix`.
    ///
    /// `ix` is either an already written slot or equal to [`BatchBase::len`],
    /// in which case the storage grows by one.
    fn push(&mut self, ix: usize, data: Self);

    /// Gathers the items at the given slots into a new batch.
    fn sample(&self, ixs: &[usize]) -> Self;

    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if no item is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes `item` at slot `ix` of `buf`, appending when `ix == buf.len()`.
pub fn write_slot<T>(buf: &mut Vec<T>, ix: usize, item: T) {
    if ix == buf.len() {
        buf.push(item);
    } else {
        buf[ix] = item;
    }
}

impl<T: Clone> BatchBase for Vec<T> {
    fn new(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn push(&mut self, ix: usize, data: Self) {
        for (j, item) in data.into_iter().enumerate() {
            write_slot(self, ix + j, item);
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        ixs.iter().map(|ix| self[*ix].clone()).collect()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// A generic implementation of [`TransitionBatch`].
///
/// Used both for transitions pushed into the buffer and for sampled batches.
#[derive(Debug, Clone)]
pub struct GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Observations.
    pub obs: O,

    /// Actions.
    pub act: A,

    /// Next observations.
    pub next_obs: O,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Termination flags.
    pub is_terminated: Vec<i8>,

    /// Truncation flags.
    pub is_truncated: Vec<i8>,

    /// Slot indices of sampled transitions. Empty for pushed transitions.
    pub ix_sample: Vec<usize>,
}

impl<O, A> TransitionBatch for GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type ObsBatch = O;
    type ActBatch = A;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
        Vec<i8>,
        Vec<usize>,
    ) {
        (
            self.obs,
            self.act,
            self.next_obs,
            self.reward,
            self.is_terminated,
            self.is_truncated,
            self.ix_sample,
        )
    }

    fn len(&self) -> usize {
        self.reward.len()
    }

    fn obs(&self) -> &Self::ObsBatch {
        &self.obs
    }

    fn act(&self) -> &Self::ActBatch {
        &self.act
    }
}
