// tests/common/mod.rs
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::Router;
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::cache::token::TokenSnapshot;
use crate::errors::ResolveError;
use crate::sources::{ParameterStoreClient, ResolveToken, SecretStoreClient, SourceKind};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

enum Behavior {
    /// call n gets step n; the last step repeats. `None` fails the resolution.
    Steps(Vec<Option<String>>),
    Inner(Arc<dyn ResolveToken>),
}

/// Resolver that counts invocations, optionally slowed down.
pub struct CountingResolver {
    calls: AtomicUsize,
    behavior: Behavior,
    delay: Duration,
}

impl CountingResolver {
    pub fn steps(steps: &[Option<&str>]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            behavior: Behavior::Steps(steps.iter().map(|s| s.map(str::to_owned)).collect()),
            delay: Duration::ZERO,
        }
    }

    pub fn fixed(token: &str) -> Self {
        Self::steps(&[Some(token)])
    }

    pub fn failing() -> Self {
        Self::steps(&[None])
    }

    pub fn wrap(inner: Arc<dyn ResolveToken>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            behavior: Behavior::Inner(inner),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolveToken for CountingResolver {
    async fn resolve(&self) -> Result<TokenSnapshot, ResolveError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.behavior {
            Behavior::Inner(inner) => inner.resolve().await,
            Behavior::Steps(steps) => {
                let step = steps.get(call).or_else(|| steps.last()).cloned().flatten();
                match step {
                    Some(token) => Ok(TokenSnapshot::new(token, SourceKind::SecretsStore)),
                    None => Err(ResolveError::Fetch {
                        kind: SourceKind::SecretsStore,
                        key: "test/secret".to_owned(),
                        reason: "simulated outage".to_owned(),
                    }),
                }
            }
        }
    }
}

/// Canned remote store response.
#[derive(Clone)]
pub enum Reply {
    Value(&'static str),
    Missing,
    Fail(&'static str),
}

impl Reply {
    fn to_result(&self) -> Result<Option<String>> {
        match self {
            Reply::Value(v) => Ok(Some(v.to_string())),
            Reply::Missing => Ok(None),
            Reply::Fail(reason) => Err(anyhow!("{}", reason)),
        }
    }
}

pub struct FakeSecretStore {
    reply: Reply,
    calls: AtomicUsize,
}

impl FakeSecretStore {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStoreClient for FakeSecretStore {
    async fn get_secret_value(&self, _secret_id: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.to_result()
    }
}

pub struct FakeParameterStore {
    reply: Reply,
    calls: AtomicUsize,
    decrypted: AtomicBool,
}

impl FakeParameterStore {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            decrypted: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn decryption_requested(&self) -> bool {
        self.decrypted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStoreClient for FakeParameterStore {
    async fn get_parameter(&self, _name: &str, with_decryption: bool) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decrypted.store(with_decryption, Ordering::SeqCst);
        self.reply.to_result()
    }
}
