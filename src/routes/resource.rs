//! Resource CRUD routes: one router per resource type, mounted at `/{PATH}`.

use crate::handlers::resource::{
    create, delete as delete_handler, list, read, update,
};
use crate::resources::Resource;
use crate::service::Repository;
use axum::{routing::get, Router};

pub fn resource_routes<T: Resource>(repo: Repository<T>) -> Router {
    Router::new()
        .route(&format!("/{}", T::PATH), get(list::<T>).post(create::<T>))
        .route(
            &format!("/{}/:id", T::PATH),
            get(read::<T>).put(update::<T>).delete(delete_handler::<T>),
        )
        .with_state(repo)
}
