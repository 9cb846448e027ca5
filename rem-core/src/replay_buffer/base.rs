//! Simple generic replay buffer.
use super::{write_slot, BatchBase, GenericTransitionBatch, SimpleReplayBufferConfig};
use crate::{error::RemError, ExperienceBufferBase, ReplayBufferBase, TransitionBatch};
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A simple generic replay buffer.
///
/// Storage grows lazily up to `capacity`, after which the oldest slot is
/// overwritten. Batches are sampled uniformly with replacement.
pub struct SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    capacity: usize,
    i: usize,
    size: usize,
    obs: O,
    act: A,
    next_obs: O,
    reward: Vec<f32>,
    is_terminated: Vec<i8>,
    is_truncated: Vec<i8>,
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the slot the next transition will be written to.
    pub fn next_slot(&self) -> usize {
        self.i
    }

    /// Gathers the transitions stored at the given slots.
    pub fn batch_at(&self, ixs: &[usize]) -> Result<GenericTransitionBatch<O, A>> {
        if self.size == 0 {
            return Err(RemError::EmptyReplayBuffer.into());
        }
        if let Some(ix) = ixs.iter().find(|ix| **ix >= self.size) {
            return Err(RemError::ShapeMismatch {
                expected: vec![self.size],
                actual: vec![*ix],
            }
            .into());
        }

        Ok(GenericTransitionBatch {
            obs: self.obs.sample(ixs),
            act: self.act.sample(ixs),
            next_obs: self.next_obs.sample(ixs),
            reward: ixs.iter().map(|ix| self.reward[*ix]).collect(),
            is_terminated: ixs.iter().map(|ix| self.is_terminated[*ix]).collect(),
            is_truncated: ixs.iter().map(|ix| self.is_truncated[*ix]).collect(),
            ix_sample: ixs.to_vec(),
        })
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = GenericTransitionBatch<O, A>;

    fn len(&self) -> usize {
        self.size
    }

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        if tr.len() != 1 {
            return Err(RemError::ShapeMismatch {
                expected: vec![1],
                actual: vec![tr.len()],
            }
            .into());
        }

        let (obs, act, next_obs, reward, is_terminated, is_truncated, _) = tr.unpack();
        self.obs.push(self.i, obs);
        self.act.push(self.i, act);
        self.next_obs.push(self.i, next_obs);
        write_slot(&mut self.reward, self.i, reward[0]);
        write_slot(&mut self.is_terminated, self.i, is_terminated[0]);
        write_slot(&mut self.is_truncated, self.i, is_truncated[0]);

        self.i = (self.i + 1) % self.capacity;
        if self.size < self.capacity {
            self.size += 1;
        }

        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = GenericTransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            capacity,
            i: 0,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: Vec::new(),
            is_terminated: Vec::new(),
            is_truncated: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if self.size == 0 {
            return Err(RemError::EmptyReplayBuffer.into());
        }
        let n = self.size;
        let ixs = (0..size)
            .map(|_| self.rng.gen_range(0..n))
            .collect::<Vec<_>>();
        self.batch_at(&ixs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Buffer = SimpleReplayBuffer<Vec<i32>, Vec<i32>>;

    fn transition(x: i32) -> GenericTransitionBatch<Vec<i32>, Vec<i32>> {
        GenericTransitionBatch {
            obs: vec![x],
            act: vec![x % 2],
            next_obs: vec![x + 1],
            reward: vec![x as f32],
            is_terminated: vec![0],
            is_truncated: vec![0],
            ix_sample: vec![],
        }
    }

    fn buffer(capacity: usize) -> Buffer {
        Buffer::build(&SimpleReplayBufferConfig::default().capacity(capacity))
    }

    #[test]
    fn test_size_grows_until_capacity() -> Result<()> {
        let mut buffer = buffer(3);
        assert!(buffer.is_empty());
        for x in 0..2 {
            buffer.push(transition(x))?;
        }
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.next_slot(), 2);
        Ok(())
    }

    #[test]
    fn test_overwrites_oldest_slot_after_wraparound() -> Result<()> {
        let capacity = 5;
        let mut buffer = buffer(capacity);
        for x in 0..(capacity as i32 + 1) {
            buffer.push(transition(x))?;
        }
        assert_eq!(buffer.len(), capacity);
        assert_eq!(buffer.next_slot(), 1);

        let batch = buffer.batch_at(&[0, 1])?;
        assert_eq!(batch.obs, vec![5, 1]);
        assert_eq!(batch.next_obs, vec![6, 2]);
        assert_eq!(batch.reward, vec![5.0, 1.0]);
        assert_eq!(batch.ix_sample, vec![0, 1]);
        Ok(())
    }

    #[test]
    fn test_sampled_indices_are_within_size() -> Result<()> {
        let mut buffer = buffer(100);
        for x in 0..7 {
            buffer.push(transition(x))?;
        }
        let batch = buffer.batch(256)?;
        assert_eq!(batch.len(), 256);
        assert!(batch.ix_sample.iter().all(|ix| *ix < 7));
        for (obs, ix) in batch.obs.iter().zip(batch.ix_sample.iter()) {
            assert_eq!(*obs, *ix as i32);
        }
        Ok(())
    }

    #[test]
    fn test_sampling_empty_buffer_fails() {
        let mut buffer = buffer(10);
        let err = buffer.batch(4).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RemError>(),
            Some(RemError::EmptyReplayBuffer)
        ));
    }

    #[test]
    fn test_push_rejects_multiple_transitions() {
        let mut buffer = buffer(10);
        let mut tr = transition(0);
        tr.reward.push(1.0);
        assert!(buffer.push(tr).is_err());
    }
}
