use std::sync::Arc;

use adapter::{
    database::ConnectionPool,
    repository::{
        author::AuthorRepositoryImpl, book::BookRepositoryImpl, borrow::BorrowRepositoryImpl,
        health::HealthCheckRepositoryImpl,
    },
};
use kernel::repository::{
    author::AuthorRepository, book::BookRepository, borrow::BorrowRepository,
    health::HealthCheckRepository,
};

#[derive(Clone)]
pub struct AppRegistryImpl {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    author_repository: Arc<dyn AuthorRepository>,
    book_repository: Arc<dyn BookRepository>,
    borrow_repository: Arc<dyn BorrowRepository>,
}

impl AppRegistryImpl {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let author_repository = Arc::new(AuthorRepositoryImpl::new(pool.clone()));
        let book_repository = Arc::new(BookRepositoryImpl::new(pool.clone()));
        let borrow_repository = Arc::new(BorrowRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            author_repository,
            book_repository,
            borrow_repository,
        }
    }
}

#[mockall::automock]
pub trait AppRegistryExt {
    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository>;
    fn author_repository(&self) -> Arc<dyn AuthorRepository>;
    fn book_repository(&self) -> Arc<dyn BookRepository>;
    fn borrow_repository(&self) -> Arc<dyn BorrowRepository>;
}

impl AppRegistryExt for AppRegistryImpl {
    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    fn author_repository(&self) -> Arc<dyn AuthorRepository> {
        self.author_repository.clone()
    }

    fn book_repository(&self) -> Arc<dyn BookRepository> {
        self.book_repository.clone()
    }

    fn borrow_repository(&self) -> Arc<dyn BorrowRepository> {
        self.borrow_repository.clone()
    }
}

pub type AppRegistry = Arc<dyn AppRegistryExt + Send + Sync + 'static>;
