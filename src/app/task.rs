// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work returned by the update function
//!
//! A task is a bundle of futures that each resolve to at most one message.
//! The [`Runtime`](super::Runtime) polls them and feeds the messages back into
//! [`AppModel::update`](super::AppModel::update).

use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;

/// Zero or more pending futures producing messages
#[must_use = "tasks do nothing unless handed to the runtime"]
pub struct Task<M> {
    futures: Vec<BoxFuture<'static, Option<M>>>,
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("futures", &self.futures.len())
            .finish()
    }
}

impl<M: Send + 'static> Task<M> {
    /// Nothing to do
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// Deliver `message` on the next poll
    pub fn done(message: M) -> Self {
        Self::future(futures::future::ready(Some(message)))
    }

    /// Run `future` and map its output to a message
    pub fn perform<T, F>(future: F, map: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::future(future.map(move |output| Some(map(output))))
    }

    /// Run a future that may resolve without a message
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = Option<M>> + Send + 'static,
    {
        Self {
            futures: vec![future.boxed()],
        }
    }

    pub fn batch(tasks: impl IntoIterator<Item = Task<M>>) -> Self {
        Self {
            futures: tasks.into_iter().flat_map(|t| t.futures).collect(),
        }
    }

    /// Append another task
    pub fn chain(mut self, other: Task<M>) -> Self {
        self.futures.extend(other.futures);
        self
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub(crate) fn into_futures(self) -> Vec<BoxFuture<'static, Option<M>>> {
        self.futures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_flattens() {
        let task = Task::batch([Task::done(1), Task::none(), Task::perform(async { 2 }, |v| v * 10)]);
        assert_eq!(task.len(), 2);

        let mut outputs = Vec::new();
        for fut in task.into_futures() {
            outputs.push(fut.await);
        }
        assert_eq!(outputs, vec![Some(1), Some(20)]);
    }
}
