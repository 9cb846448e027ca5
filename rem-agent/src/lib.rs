//! Random ensemble mixture agent.
//!
//! [`Rem`](rem::Rem) keeps `H` Q-value heads per action. During learning the heads
//! are mixed with random convex weights drawn at every optimization step, while
//! actions are chosen on the mean over heads. The network itself is abstracted by
//! [`RemModel`](rem::RemModel).
pub mod rem;
pub mod util;
