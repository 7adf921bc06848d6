//! Origin Getter
//!
//! The data source a group falls back to when no peer can serve a key.

use async_trait::async_trait;

// == Getter ==
/// Loads the authoritative bytes for a key.
///
/// Any error is reported to the caller of `Group::get` unchanged.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Getter Fn ==
/// Adapts a plain function or closure into a [`Getter`].
pub struct GetterFn<F>(pub F);

impl<F> GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}
