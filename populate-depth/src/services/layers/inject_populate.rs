//! Computes a populate directive for content API reads that did not ask for one.

use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use http::Method;
use tower::Layer;
use tower::Service;

use crate::configuration::Configuration;
use crate::configuration::ContentApi;
use crate::error::InjectionError;
use crate::inflection::InflectorPluralizer;
use crate::inflection::Pluralizer;
use crate::services::content;
use crate::spec::Populate;
use crate::spec::PopulateResolver;
use crate::spec::SchemaIdentifier;
use crate::spec::SchemaRegistry;

/// Layer injecting computed populate directives.
///
/// Requests that are not content API reads, that target an excluded namespace or
/// that carry their own `populate` go through untouched.
#[derive(Clone)]
pub struct InjectPopulateLayer {
    resolver: PopulateResolver,
    content_api: Arc<ContentApi>,
    pluralizer: Arc<dyn Pluralizer>,
}

impl InjectPopulateLayer {
    pub fn new(configuration: &Configuration, registry: Arc<dyn SchemaRegistry>) -> Self {
        Self {
            resolver: PopulateResolver::new(Arc::new(configuration.populate.clone()), registry),
            content_api: Arc::new(configuration.content_api.clone()),
            pluralizer: Arc::new(InflectorPluralizer),
        }
    }

    /// Replaces the English inflection rules.
    pub fn with_pluralizer(mut self, pluralizer: Arc<dyn Pluralizer>) -> Self {
        self.pluralizer = pluralizer;
        self
    }
}

impl<S> Layer<S> for InjectPopulateLayer {
    type Service = InjectPopulate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InjectPopulate {
            inner,
            resolver: self.resolver.clone(),
            content_api: self.content_api.clone(),
            pluralizer: self.pluralizer.clone(),
        }
    }
}

/// Service injecting computed populate directives. See [`InjectPopulateLayer`].
#[derive(Clone)]
pub struct InjectPopulate<S> {
    inner: S,
    resolver: PopulateResolver,
    content_api: Arc<ContentApi>,
    pluralizer: Arc<dyn Pluralizer>,
}

impl<S> InjectPopulate<S> {
    /// The directive for `request`, or `None` if it should go through untouched.
    fn directive(
        &self,
        request: &content::Request,
    ) -> Result<Option<(SchemaIdentifier, Populate)>, InjectionError> {
        if !matches!(*request.method(), Method::GET | Method::HEAD) {
            return Ok(None);
        }
        let Some(rest) = self.content_api.strip_prefix(request.path()) else {
            return Ok(None);
        };
        if request.has_explicit_populate() {
            return Ok(None);
        }
        let name = rest.split('/').next().unwrap_or_default();
        if name.is_empty() {
            return Err(InjectionError::UnextractableContentType {
                path: request.path().to_string(),
            });
        }
        if self.content_api.is_excluded(name) {
            return Ok(None);
        }
        let singular = self
            .pluralizer
            .singular(name)
            .filter(|singular| !singular.is_empty())
            .ok_or_else(|| InjectionError::UnsingularizableName {
                name: name.to_string(),
            })?;

        let type_id = SchemaIdentifier::api(&singular);
        let populate = self
            .resolver
            .resolve(type_id.as_str())
            .map_err(|source| InjectionError::Traversal {
                type_id: type_id.to_string(),
                source,
            })?;
        Ok(Some((type_id, populate)))
    }
}

impl<S> Service<content::Request> for InjectPopulate<S>
where
    S: Service<content::Request, Response = content::Response>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: content::Request) -> Self::Future {
        match self.directive(&request) {
            Ok(Some((type_id, populate))) => {
                if let Err(error) = request.set_populate(&populate) {
                    tracing::error!(%type_id, %error, "could not attach populate directive");
                }
            }
            Ok(None) => {}
            Err(error @ InjectionError::Traversal { .. }) => {
                tracing::error!(%error, "populate directive not injected");
            }
            Err(error) => {
                tracing::warn!(%error, "populate directive not injected");
            }
        }
        self.inner.call(request)
    }
}
