//! Memoized construction of the repository → service → handler chains.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::ContainerError;
use crate::api::handlers::{PostHandler, UserHandler};
use crate::db::AsyncDbPool;
use crate::repositories::{PgPostRepository, PgUserRepository, PostRepository, UserRepository};
use crate::services::{PostService, UserService};

/// Every component the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    UserRepository,
    UserService,
    UserHandler,
    PostRepository,
    PostService,
    PostHandler,
}

impl ComponentKey {
    pub const ALL: [ComponentKey; 6] = [
        ComponentKey::UserRepository,
        ComponentKey::UserService,
        ComponentKey::UserHandler,
        ComponentKey::PostRepository,
        ComponentKey::PostService,
        ComponentKey::PostHandler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKey::UserRepository => "user_repository",
            ComponentKey::UserService => "user_service",
            ComponentKey::UserHandler => "user_handler",
            ComponentKey::PostRepository => "post_repository",
            ComponentKey::PostService => "post_service",
            ComponentKey::PostHandler => "post_handler",
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKey {
    type Err = ContainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ContainerError::UnknownComponent(s.to_string()))
    }
}

/// A cached repository: the trait object services depend on, and the same
/// value erased once for [`ServiceFactory::resolve`]. Trait-object `Arc`s
/// cannot be upcast to `dyn Any`, so the erased handle is built alongside.
struct RepositorySlot<R: ?Sized> {
    typed: Arc<R>,
    erased: Arc<dyn Any + Send + Sync>,
}

impl<R: ?Sized + Send + Sync + 'static> RepositorySlot<R> {
    fn new(typed: Arc<R>) -> Self {
        let erased: Arc<dyn Any + Send + Sync> = Arc::new(Arc::clone(&typed));
        Self { typed, erased }
    }
}

/// Lazily builds each component once and hands out the same `Arc` on every
/// later request. Each slot is a `OnceCell`, so concurrent first requests
/// for one component construct it exactly once.
pub struct ServiceFactory {
    pool: AsyncDbPool,
    user_repository: OnceCell<RepositorySlot<dyn UserRepository>>,
    user_service: OnceCell<Arc<UserService>>,
    user_handler: OnceCell<Arc<UserHandler>>,
    post_repository: OnceCell<RepositorySlot<dyn PostRepository>>,
    post_service: OnceCell<Arc<PostService>>,
    post_handler: OnceCell<Arc<PostHandler>>,
}

impl ServiceFactory {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            pool,
            user_repository: OnceCell::new(),
            user_service: OnceCell::new(),
            user_handler: OnceCell::new(),
            post_repository: OnceCell::new(),
            post_service: OnceCell::new(),
            post_handler: OnceCell::new(),
        }
    }

    async fn user_repository_slot(
        &self,
    ) -> Result<&RepositorySlot<dyn UserRepository>, ContainerError> {
        self.user_repository
            .get_or_try_init(|| async {
                constructed(ComponentKey::UserRepository);
                let repo: Arc<dyn UserRepository> =
                    Arc::new(PgUserRepository::new(self.pool.clone()));
                Ok::<_, ContainerError>(RepositorySlot::new(repo))
            })
            .await
    }

    pub async fn user_repository(&self) -> Result<Arc<dyn UserRepository>, ContainerError> {
        Ok(Arc::clone(&self.user_repository_slot().await?.typed))
    }

    pub async fn user_service(&self) -> Result<Arc<UserService>, ContainerError> {
        let service = self
            .user_service
            .get_or_try_init(|| async {
                let repo = self.user_repository().await?;
                constructed(ComponentKey::UserService);
                Ok::<_, ContainerError>(Arc::new(UserService::new(repo)))
            })
            .await?;
        Ok(Arc::clone(service))
    }

    pub async fn user_handler(&self) -> Result<Arc<UserHandler>, ContainerError> {
        let handler = self
            .user_handler
            .get_or_try_init(|| async {
                let service = self.user_service().await?;
                constructed(ComponentKey::UserHandler);
                Ok::<_, ContainerError>(Arc::new(UserHandler::new(service)))
            })
            .await?;
        Ok(Arc::clone(handler))
    }

    async fn post_repository_slot(
        &self,
    ) -> Result<&RepositorySlot<dyn PostRepository>, ContainerError> {
        self.post_repository
            .get_or_try_init(|| async {
                constructed(ComponentKey::PostRepository);
                let repo: Arc<dyn PostRepository> =
                    Arc::new(PgPostRepository::new(self.pool.clone()));
                Ok::<_, ContainerError>(RepositorySlot::new(repo))
            })
            .await
    }

    pub async fn post_repository(&self) -> Result<Arc<dyn PostRepository>, ContainerError> {
        Ok(Arc::clone(&self.post_repository_slot().await?.typed))
    }

    pub async fn post_service(&self) -> Result<Arc<PostService>, ContainerError> {
        let service = self
            .post_service
            .get_or_try_init(|| async {
                let repo = self.post_repository().await?;
                constructed(ComponentKey::PostService);
                Ok::<_, ContainerError>(Arc::new(PostService::new(repo)))
            })
            .await?;
        Ok(Arc::clone(service))
    }

    pub async fn post_handler(&self) -> Result<Arc<PostHandler>, ContainerError> {
        let handler = self
            .post_handler
            .get_or_try_init(|| async {
                let service = self.post_service().await?;
                constructed(ComponentKey::PostHandler);
                Ok::<_, ContainerError>(Arc::new(PostHandler::new(service)))
            })
            .await?;
        Ok(Arc::clone(handler))
    }

    /// Resolves a component by key as a type-erased `Arc`. Downcast to the
    /// concrete type the key names (`Arc<dyn UserRepository>` and
    /// `Arc<dyn PostRepository>` for the repositories).
    pub async fn resolve(&self, key: ComponentKey) -> Result<Arc<dyn Any + Send + Sync>, ContainerError> {
        let component: Arc<dyn Any + Send + Sync> = match key {
            ComponentKey::UserRepository => Arc::clone(&self.user_repository_slot().await?.erased),
            ComponentKey::UserService => self.user_service().await?,
            ComponentKey::UserHandler => self.user_handler().await?,
            ComponentKey::PostRepository => Arc::clone(&self.post_repository_slot().await?.erased),
            ComponentKey::PostService => self.post_service().await?,
            ComponentKey::PostHandler => self.post_handler().await?,
        };
        Ok(component)
    }

    /// Like [`resolve`](Self::resolve), looking the key up by name first.
    pub async fn resolve_named(&self, name: &str) -> Result<Arc<dyn Any + Send + Sync>, ContainerError> {
        self.resolve(name.parse()?).await
    }
}

fn constructed(key: ComponentKey) {
    tracing::debug!(component = %key, "Component constructed");
}
