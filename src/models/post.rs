use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::models::User;

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i32,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::posts)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: Option<Timestamp>,
}

/// A post together with its author, as every read path returns it.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: User,
}

impl From<(Post, User)> for PostWithAuthor {
    fn from((post, author): (Post, User)) -> Self {
        Self { post, author }
    }
}
