//! A generic implementation of [`StepProcessor`].
use super::{BatchBase, GenericTransitionBatch};
use crate::{error::RemError, Env, StepProcessor};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SimpleStepProcessorConfig {}

/// A generic implementation of [`StepProcessor`].
///
/// It produces 1-step transitions `(o_t, a_t, o_t+1, r_t)` for a non-vectorized
/// environment.
pub struct SimpleStepProcessor<E, O, A> {
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Config = SimpleStepProcessorConfig;
    type Output = GenericTransitionBatch<O, A>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    fn process(&mut self, step: crate::Step<E>) -> Result<Self::Output> {
        let is_done = step.is_done();
        let next_obs: O = step.obs.clone().into();
        let obs = match is_done {
            true => {
                let init_obs = step.init_obs.ok_or(RemError::ResetRequired)?;
                self.prev_obs.replace(init_obs.into())
            }
            false => self.prev_obs.replace(step.obs.into()),
        }
        .ok_or(RemError::ResetRequired)?;

        Ok(GenericTransitionBatch {
            obs,
            act: step.act.into(),
            next_obs,
            reward: vec![step.reward],
            is_terminated: vec![step.is_terminated],
            is_truncated: vec![step.is_truncated],
            ix_sample: vec![],
        })
    }
}
