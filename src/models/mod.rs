mod post;
mod user;

pub use post::{NewPost, Post, PostWithAuthor, UpdatePost};
pub use user::{NewUser, UpdateUser, User};
