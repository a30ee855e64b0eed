//! Context resolvers
//!
//! Each piece of audit metadata (actor, origin, network address, client
//! agent) comes from its own resolver so that any one of them can be
//! replaced without touching the others. Resolvers never fail: missing
//! context is reported as `None` (or the console sentinel for the origin).
//!
//! Closures implement the resolver traits directly, which keeps stubbing a
//! single resolver in tests short:
//!
//! ```rust,ignore
//! let resolvers = ContextResolverSet::detached()
//!     .with_client_agent(|| Some("curl/8.0".to_string()));
//! ```

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::{Arc, RwLock};

/// Origin reported when there is no interactive request
pub const CONSOLE_ORIGIN: &str = "console";

/// Whoever performed a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub actor_type: String,
}

impl Actor {
    pub fn new(actor_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actor_type: actor_type.into(),
        }
    }
}

pub trait ActorResolver: Send + Sync {
    fn resolve(&self) -> Option<Actor>;
}

pub trait OriginResolver: Send + Sync {
    /// Origin locator, or `CONSOLE_ORIGIN` outside any request
    fn resolve(&self) -> String;
}

pub trait NetworkAddressResolver: Send + Sync {
    fn resolve(&self) -> Option<IpAddr>;
}

pub trait ClientAgentResolver: Send + Sync {
    fn resolve(&self) -> Option<String>;
}

impl<F> ActorResolver for F
where
    F: Fn() -> Option<Actor> + Send + Sync,
{
    fn resolve(&self) -> Option<Actor> {
        self()
    }
}

impl<F> OriginResolver for F
where
    F: Fn() -> String + Send + Sync,
{
    fn resolve(&self) -> String {
        self()
    }
}

impl<F> NetworkAddressResolver for F
where
    F: Fn() -> Option<IpAddr> + Send + Sync,
{
    fn resolve(&self) -> Option<IpAddr> {
        self()
    }
}

impl<F> ClientAgentResolver for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn resolve(&self) -> Option<String> {
        self()
    }
}

/// Resolver used when there is no context at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl ActorResolver for Detached {
    fn resolve(&self) -> Option<Actor> {
        None
    }
}

impl OriginResolver for Detached {
    fn resolve(&self) -> String {
        CONSOLE_ORIGIN.to_string()
    }
}

impl NetworkAddressResolver for Detached {
    fn resolve(&self) -> Option<IpAddr> {
        None
    }
}

impl ClientAgentResolver for Detached {
    fn resolve(&self) -> Option<String> {
        None
    }
}

/// Details of the request currently being served
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub url: String,
    pub client_address: Option<IpAddr>,
    pub client_agent: Option<String>,
    pub actor: Option<Actor>,
}

/// Holder for the active request, filled in by the host around each request
#[derive(Debug, Default)]
pub struct RequestScope {
    current: RwLock<Option<RequestContext>>,
}

impl RequestScope {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `context` the active request
    pub fn enter(&self, context: RequestContext) {
        // A poisoned lock still holds a usable value
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(context);
    }

    /// Leave the active request
    pub fn exit(&self) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }

    fn with<T>(&self, f: impl FnOnce(&RequestContext) -> Option<T>) -> Option<T> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        current.as_ref().and_then(f)
    }
}

/// Reads the actor of the active request
pub struct ScopedActor(pub Arc<RequestScope>);

impl ActorResolver for ScopedActor {
    fn resolve(&self) -> Option<Actor> {
        self.0.with(|ctx| ctx.actor.clone())
    }
}

/// Reads the full URL of the active request
pub struct ScopedOrigin(pub Arc<RequestScope>);

impl OriginResolver for ScopedOrigin {
    fn resolve(&self) -> String {
        self.0
            .with(|ctx| Some(ctx.url.clone()))
            .unwrap_or_else(|| CONSOLE_ORIGIN.to_string())
    }
}

/// Reads the client address of the active request
pub struct ScopedNetworkAddress(pub Arc<RequestScope>);

impl NetworkAddressResolver for ScopedNetworkAddress {
    fn resolve(&self) -> Option<IpAddr> {
        self.0.with(|ctx| ctx.client_address)
    }
}

/// Reads the user agent of the active request
pub struct ScopedClientAgent(pub Arc<RequestScope>);

impl ClientAgentResolver for ScopedClientAgent {
    fn resolve(&self) -> Option<String> {
        self.0.with(|ctx| ctx.client_agent.clone())
    }
}

/// Context values captured at the moment a record is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub actor: Option<Actor>,
    pub origin_url: String,
    pub client_address: Option<IpAddr>,
    pub client_agent: Option<String>,
}

/// The four resolvers used when building audit records
pub struct ContextResolverSet {
    actor: Box<dyn ActorResolver>,
    origin: Box<dyn OriginResolver>,
    network_address: Box<dyn NetworkAddressResolver>,
    client_agent: Box<dyn ClientAgentResolver>,
}

impl ContextResolverSet {
    /// No actor, console origin, no address or agent
    pub fn detached() -> Self {
        Self {
            actor: Box::new(Detached),
            origin: Box::new(Detached),
            network_address: Box::new(Detached),
            client_agent: Box::new(Detached),
        }
    }

    /// Resolve everything from a shared request scope
    pub fn from_scope(scope: Arc<RequestScope>) -> Self {
        Self {
            actor: Box::new(ScopedActor(scope.clone())),
            origin: Box::new(ScopedOrigin(scope.clone())),
            network_address: Box::new(ScopedNetworkAddress(scope.clone())),
            client_agent: Box::new(ScopedClientAgent(scope)),
        }
    }

    pub fn with_actor(mut self, resolver: impl ActorResolver + 'static) -> Self {
        self.actor = Box::new(resolver);
        self
    }

    pub fn with_origin(mut self, resolver: impl OriginResolver + 'static) -> Self {
        self.origin = Box::new(resolver);
        self
    }

    pub fn with_network_address(
        mut self,
        resolver: impl NetworkAddressResolver + 'static,
    ) -> Self {
        self.network_address = Box::new(resolver);
        self
    }

    pub fn with_client_agent(mut self, resolver: impl ClientAgentResolver + 'static) -> Self {
        self.client_agent = Box::new(resolver);
        self
    }

    pub fn actor(&self) -> Option<Actor> {
        self.actor.resolve()
    }

    pub fn origin(&self) -> String {
        self.origin.resolve()
    }

    pub fn network_address(&self) -> Option<IpAddr> {
        self.network_address.resolve()
    }

    pub fn client_agent(&self) -> Option<String> {
        self.client_agent.resolve()
    }

    /// Ask every resolver for its current value
    pub fn resolve(&self) -> ResolvedContext {
        ResolvedContext {
            actor: self.actor(),
            origin_url: self.origin(),
            client_address: self.network_address(),
            client_agent: self.client_agent(),
        }
    }
}

impl Default for ContextResolverSet {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn request() -> RequestContext {
        RequestContext {
            url: "https://example.com/people/1?tab=edit".to_string(),
            client_address: Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))),
            client_agent: Some("Mozilla/5.0".to_string()),
            actor: Some(Actor::new("users", "5")),
        }
    }

    #[test]
    fn test_detached_context() {
        let resolved = ContextResolverSet::detached().resolve();
        assert_eq!(resolved.actor, None);
        assert_eq!(resolved.origin_url, CONSOLE_ORIGIN);
        assert_eq!(resolved.client_address, None);
        assert_eq!(resolved.client_agent, None);
    }

    #[test]
    fn test_stub_one_resolver() {
        let resolvers =
            ContextResolverSet::detached().with_client_agent(|| Some("curl/8.0".to_string()));
        let resolved = resolvers.resolve();
        assert_eq!(resolved.client_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(resolved.origin_url, CONSOLE_ORIGIN);
        assert_eq!(resolved.actor, None);
    }

    #[test]
    fn test_scope_outside_request() {
        let scope = RequestScope::new();
        let resolved = ContextResolverSet::from_scope(scope).resolve();
        assert_eq!(resolved.origin_url, CONSOLE_ORIGIN);
        assert_eq!(resolved.actor, None);
    }

    #[test]
    fn test_scope_inside_request() {
        let scope = RequestScope::new();
        let resolvers = ContextResolverSet::from_scope(scope.clone());

        scope.enter(request());
        let resolved = resolvers.resolve();
        assert_eq!(resolved.origin_url, "https://example.com/people/1?tab=edit");
        assert_eq!(resolved.actor, Some(Actor::new("users", "5")));
        assert_eq!(resolved.client_agent.as_deref(), Some("Mozilla/5.0"));

        scope.exit();
        assert_eq!(resolvers.origin(), CONSOLE_ORIGIN);
        assert_eq!(resolvers.network_address(), None);
    }

    #[test]
    fn test_resolvers_are_read_at_call_time() {
        let scope = RequestScope::new();
        let resolvers = ContextResolverSet::from_scope(scope.clone());
        assert_eq!(resolvers.network_address(), None);

        scope.enter(request());
        assert_eq!(
            resolvers.network_address(),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)))
        );
    }
}
