//! Blog service for Yatube.
//!
//! Assembles the data behind each page and runs the create/edit post flows.
//! The caller passes the resolved identity explicitly; lookups by slug,
//! username or id that miss return [`YatubeError::NotFound`].

use serde::Serialize;
use tracing::{debug, info};

use crate::auth::Identity;
use crate::db::{Author, Database, UserRepository};
use crate::{Result, YatubeError};

use super::form::{CleanedPost, FormErrors, PostForm, INVALID_GROUP_MESSAGE};
use super::group::Group;
use super::group_repository::GroupRepository;
use super::paginator::{Page, Paginator};
use super::post::{NewPost, Post, PostUpdate, PostView};
use super::post_repository::PostRepository;

/// Group page data.
#[derive(Debug, Clone, Serialize)]
pub struct GroupContext {
    pub group: Group,
    pub page: Page<PostView>,
}

/// Profile page data.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileContext {
    pub author: Author,
    pub page: Page<PostView>,
    /// Number of posts the author has written.
    pub post_count: i64,
}

/// Post detail page data.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailContext {
    pub post: PostView,
    pub author: Author,
    pub author_post_count: i64,
    /// Whether the viewer may edit the post.
    pub is_author: bool,
}

/// A group offered in the post form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOption {
    pub id: i64,
    pub title: String,
    pub selected: bool,
}

/// Data for rendering the create/edit form.
#[derive(Debug, Clone, Serialize)]
pub struct PostFormContext {
    /// Submitted (or current) text.
    pub text: String,
    /// Submitted (or current) group value.
    pub group: String,
    pub errors: FormErrors,
    pub groups: Vec<GroupOption>,
    pub is_edit: bool,
    pub post_id: Option<i64>,
}

/// Outcome of a create/edit request.
#[derive(Debug, Clone)]
pub enum PostFlow {
    /// Show the form, possibly with errors.
    FormShown(PostFormContext),
    /// The post was saved.
    Persisted(Post),
    /// The requester is not the author; nothing was changed.
    NotAuthor { post_id: i64 },
}

/// Service for the blog pages and post submissions.
pub struct BlogService<'a> {
    db: &'a Database,
}

impl<'a> BlogService<'a> {
    /// Create a new BlogService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All posts, newest first.
    pub async fn home(&self, requested_page: Option<&str>) -> Result<Page<PostView>> {
        let repo = PostRepository::new(self.db.pool());
        let paginator = Paginator::for_posts(repo.count().await?);
        let number = paginator.resolve(requested_page);
        let items = repo
            .list_recent(paginator.offset(number), paginator.per_page())
            .await?;
        Ok(paginator.page(number, items))
    }

    /// A group and a page of its posts.
    pub async fn group_posts(&self, slug: &str, requested_page: Option<&str>) -> Result<GroupContext> {
        let group = GroupRepository::new(self.db.pool())
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| YatubeError::NotFound(format!("group '{slug}'")))?;

        let repo = PostRepository::new(self.db.pool());
        let paginator = Paginator::for_posts(repo.count_by_group(group.id).await?);
        let number = paginator.resolve(requested_page);
        let items = repo
            .list_by_group(group.id, paginator.offset(number), paginator.per_page())
            .await?;

        Ok(GroupContext {
            group,
            page: paginator.page(number, items),
        })
    }

    /// An author and a page of their posts.
    pub async fn profile(&self, username: &str, requested_page: Option<&str>) -> Result<ProfileContext> {
        let user = UserRepository::new(self.db.pool())
            .get_by_username(username)
            .await?
            .ok_or_else(|| YatubeError::NotFound(format!("user '{username}'")))?;

        let repo = PostRepository::new(self.db.pool());
        let post_count = repo.count_by_author(user.id).await?;
        let paginator = Paginator::for_posts(post_count);
        let number = paginator.resolve(requested_page);
        let items = repo
            .list_by_author(user.id, paginator.offset(number), paginator.per_page())
            .await?;

        Ok(ProfileContext {
            author: user.author(),
            page: paginator.page(number, items),
            post_count,
        })
    }

    /// A single post with its author.
    pub async fn post_detail(&self, post_id: i64, viewer: Option<&Identity>) -> Result<PostDetailContext> {
        let repo = PostRepository::new(self.db.pool());
        let post = repo
            .get_view_by_id(post_id)
            .await?
            .ok_or_else(|| YatubeError::NotFound(format!("post {post_id}")))?;
        let author_post_count = repo.count_by_author(post.author_id).await?;

        let author = Author {
            id: post.author_id,
            username: post.author_username.clone(),
        };
        let is_author = viewer.is_some_and(|identity| identity.user_id == post.author_id);

        Ok(PostDetailContext {
            post,
            author,
            author_post_count,
            is_author,
        })
    }

    /// Empty form for a new post.
    pub async fn new_post_form(&self) -> Result<PostFormContext> {
        self.form_context(&PostForm::default(), FormErrors::new(), None)
            .await
    }

    /// Validate and save a new post written by `identity`.
    pub async fn create_post(&self, identity: &Identity, form: &PostForm) -> Result<PostFlow> {
        match self.clean(form).await? {
            Ok(cleaned) => {
                let new_post = NewPost::new(identity.user_id, cleaned.text).with_group(cleaned.group_id);
                let post = PostRepository::new(self.db.pool()).create(&new_post).await?;
                info!(post_id = post.id, author = %identity.username, "Post created");
                Ok(PostFlow::Persisted(post))
            }
            Err(errors) => Ok(PostFlow::FormShown(
                self.form_context(form, errors, None).await?,
            )),
        }
    }

    /// Form pre-filled with a post, for its author.
    pub async fn edit_post_form(&self, identity: &Identity, post_id: i64) -> Result<PostFlow> {
        let post = self.find_post(post_id).await?;
        if !post.is_authored_by(identity.user_id) {
            debug!(post_id, user = %identity.username, "Edit form refused to non-author");
            return Ok(PostFlow::NotAuthor { post_id });
        }

        let form = PostForm::from_post(&post);
        Ok(PostFlow::FormShown(
            self.form_context(&form, FormErrors::new(), Some(post.id))
                .await?,
        ))
    }

    /// Validate and save changes to a post.
    ///
    /// Authorship is checked before the form; author and publication date
    /// never change.
    pub async fn edit_post(&self, identity: &Identity, post_id: i64, form: &PostForm) -> Result<PostFlow> {
        let post = self.find_post(post_id).await?;
        if !post.is_authored_by(identity.user_id) {
            debug!(post_id, user = %identity.username, "Edit refused to non-author");
            return Ok(PostFlow::NotAuthor { post_id });
        }

        match self.clean(form).await? {
            Ok(cleaned) => {
                let update = PostUpdate::new().text(cleaned.text).group(cleaned.group_id);
                let updated = PostRepository::new(self.db.pool())
                    .update(post.id, &update)
                    .await?
                    .ok_or_else(|| YatubeError::NotFound(format!("post {post_id}")))?;
                info!(post_id, author = %identity.username, "Post edited");
                Ok(PostFlow::Persisted(updated))
            }
            Err(errors) => Ok(PostFlow::FormShown(
                self.form_context(form, errors, Some(post.id)).await?,
            )),
        }
    }

    async fn find_post(&self, post_id: i64) -> Result<Post> {
        PostRepository::new(self.db.pool())
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| YatubeError::NotFound(format!("post {post_id}")))
    }

    /// Field rules plus the check that the chosen group exists.
    async fn clean(&self, form: &PostForm) -> Result<std::result::Result<CleanedPost, FormErrors>> {
        let group_missing = match form.group_id() {
            Some(id) => GroupRepository::new(self.db.pool())
                .get_by_id(id)
                .await?
                .is_none(),
            None => false,
        };

        Ok(match form.clean() {
            Ok(_) if group_missing => Err(FormErrors::invalid_group()),
            Err(mut errors) if group_missing && errors.field("group").is_empty() => {
                errors.add("group", INVALID_GROUP_MESSAGE);
                Err(errors)
            }
            other => other,
        })
    }

    async fn form_context(
        &self,
        form: &PostForm,
        errors: FormErrors,
        post_id: Option<i64>,
    ) -> Result<PostFormContext> {
        let selected = form.group_id();
        let groups = GroupRepository::new(self.db.pool())
            .list_all()
            .await?
            .into_iter()
            .map(|group| GroupOption {
                selected: selected == Some(group.id),
                id: group.id,
                title: group.title,
            })
            .collect();

        Ok(PostFormContext {
            text: form.text.clone(),
            group: form.group.clone(),
            errors,
            groups,
            is_edit: post_id.is_some(),
            post_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::form::{TEXT_REQUIRED_MESSAGE, TEXT_TOO_SHORT_MESSAGE};
    use crate::blog::NewGroup;
    use crate::db::NewUser;

    struct Fixture {
        db: Database,
        leo: Identity,
        ann: Identity,
        cats: Group,
        dogs: Group,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let leo = users.create(&NewUser::new("leo", "hash")).await.unwrap();
        let ann = users.create(&NewUser::new("ann", "hash")).await.unwrap();
        let groups = GroupRepository::new(db.pool());
        let cats = groups.create(&NewGroup::new("cats", "Cats")).await.unwrap();
        let dogs = groups.create(&NewGroup::new("dogs", "Dogs")).await.unwrap();

        Fixture {
            db,
            leo: Identity::new(leo.id, leo.username),
            ann: Identity::new(ann.id, ann.username),
            cats,
            dogs,
        }
    }

    fn form(text: &str, group: Option<i64>) -> PostForm {
        PostForm {
            text: text.to_string(),
            group: group.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    async fn add_post(fx: &Fixture, author: &Identity, text: &str, group: Option<i64>) -> Post {
        PostRepository::new(fx.db.pool())
            .create(&NewPost::new(author.user_id, text).with_group(group))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_home_paginates_newest_first() {
        let fx = setup().await;
        for i in 0..13 {
            add_post(&fx, &fx.leo, &format!("Post number {i}"), None).await;
        }
        let service = BlogService::new(&fx.db);

        let first = service.home(None).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].text, "Post number 12");
        assert_eq!(first.num_pages, 2);

        let second = service.home(Some("2")).await.unwrap();
        assert_eq!(second.items.len(), 3);
        assert_eq!(second.items[2].text, "Post number 0");

        let clamped = service.home(Some("50")).await.unwrap();
        assert_eq!(clamped.number, 2);
    }

    #[tokio::test]
    async fn test_group_posts() {
        let fx = setup().await;
        add_post(&fx, &fx.leo, "A post about cats", Some(fx.cats.id)).await;
        add_post(&fx, &fx.leo, "A post about dogs", Some(fx.dogs.id)).await;
        let service = BlogService::new(&fx.db);

        let ctx = service.group_posts("cats", None).await.unwrap();
        assert_eq!(ctx.group, fx.cats);
        assert_eq!(ctx.page.total, 1);
        assert_eq!(ctx.page.items[0].text, "A post about cats");

        let missing = service.group_posts("birds", None).await;
        assert!(matches!(missing, Err(YatubeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile() {
        let fx = setup().await;
        add_post(&fx, &fx.leo, "Leo writes a post", None).await;
        add_post(&fx, &fx.leo, "Leo writes again", None).await;
        add_post(&fx, &fx.ann, "Ann writes a post", None).await;
        let service = BlogService::new(&fx.db);

        let ctx = service.profile("leo", None).await.unwrap();
        assert_eq!(ctx.author.username, "leo");
        assert_eq!(ctx.post_count, 2);
        assert!(ctx.page.items.iter().all(|p| p.author_id == fx.leo.user_id));

        let missing = service.profile("nobody", None).await;
        assert!(matches!(missing, Err(YatubeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_post_detail() {
        let fx = setup().await;
        let post = add_post(&fx, &fx.leo, "Leo writes a post", Some(fx.cats.id)).await;
        add_post(&fx, &fx.leo, "Leo writes again", None).await;
        let service = BlogService::new(&fx.db);

        let ctx = service.post_detail(post.id, Some(&fx.leo)).await.unwrap();
        assert_eq!(ctx.post.text, "Leo writes a post");
        assert_eq!(ctx.author.username, "leo");
        assert_eq!(ctx.author_post_count, 2);
        assert!(ctx.is_author);

        let as_ann = service.post_detail(post.id, Some(&fx.ann)).await.unwrap();
        assert!(!as_ann.is_author);
        let anonymous = service.post_detail(post.id, None).await.unwrap();
        assert!(!anonymous.is_author);

        let missing = service.post_detail(999, None).await;
        assert!(matches!(missing, Err(YatubeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_new_post_form_lists_groups() {
        let fx = setup().await;
        let ctx = BlogService::new(&fx.db).new_post_form().await.unwrap();

        assert!(!ctx.is_edit);
        assert!(ctx.text.is_empty());
        assert!(ctx.errors.is_empty());
        let titles: Vec<&str> = ctx.groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Cats", "Dogs"]);
        assert!(ctx.groups.iter().all(|g| !g.selected));
    }

    #[tokio::test]
    async fn test_create_post_persists_with_author() {
        let fx = setup().await;
        let service = BlogService::new(&fx.db);

        let flow = service
            .create_post(&fx.leo, &form("Теcт добавления поста", Some(fx.cats.id)))
            .await
            .unwrap();

        let PostFlow::Persisted(post) = flow else {
            panic!("expected the post to be saved");
        };
        assert_eq!(post.author_id, fx.leo.user_id);
        assert_eq!(post.group_id, Some(fx.cats.id));
        assert_eq!(post.text, "Теcт добавления поста");
        assert_eq!(PostRepository::new(fx.db.pool()).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_post_invalid_shows_errors() {
        let fx = setup().await;
        let service = BlogService::new(&fx.db);

        let flow = service.create_post(&fx.leo, &form("", None)).await.unwrap();
        let PostFlow::FormShown(ctx) = flow else {
            panic!("expected the form to be shown");
        };
        assert_eq!(ctx.errors.field("text"), [TEXT_REQUIRED_MESSAGE.to_string()]);

        let flow = service
            .create_post(&fx.leo, &form("too short", None))
            .await
            .unwrap();
        let PostFlow::FormShown(ctx) = flow else {
            panic!("expected the form to be shown");
        };
        assert_eq!(ctx.errors.field("text"), [TEXT_TOO_SHORT_MESSAGE.to_string()]);
        assert_eq!(ctx.text, "too short");

        assert_eq!(PostRepository::new(fx.db.pool()).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_post_unknown_group() {
        let fx = setup().await;
        let service = BlogService::new(&fx.db);

        let flow = service
            .create_post(&fx.leo, &form("Long enough text here", Some(999)))
            .await
            .unwrap();
        let PostFlow::FormShown(ctx) = flow else {
            panic!("expected the form to be shown");
        };
        assert_eq!(ctx.errors.field("group"), [INVALID_GROUP_MESSAGE.to_string()]);

        let flow = service.create_post(&fx.leo, &form("short", Some(999))).await.unwrap();
        let PostFlow::FormShown(ctx) = flow else {
            panic!("expected the form to be shown");
        };
        assert_eq!(ctx.errors.field("text").len(), 1);
        assert_eq!(ctx.errors.field("group").len(), 1);
    }

    #[tokio::test]
    async fn test_edit_post_form_prefilled_for_author() {
        let fx = setup().await;
        let post = add_post(&fx, &fx.leo, "Original post text", Some(fx.dogs.id)).await;
        let service = BlogService::new(&fx.db);

        let flow = service.edit_post_form(&fx.leo, post.id).await.unwrap();
        let PostFlow::FormShown(ctx) = flow else {
            panic!("expected the form to be shown");
        };
        assert!(ctx.is_edit);
        assert_eq!(ctx.post_id, Some(post.id));
        assert_eq!(ctx.text, "Original post text");
        let selected: Vec<i64> = ctx.groups.iter().filter(|g| g.selected).map(|g| g.id).collect();
        assert_eq!(selected, vec![fx.dogs.id]);

        let flow = service.edit_post_form(&fx.ann, post.id).await.unwrap();
        assert!(matches!(flow, PostFlow::NotAuthor { post_id } if post_id == post.id));
    }

    #[tokio::test]
    async fn test_edit_post_by_author_moves_group() {
        let fx = setup().await;
        let post = add_post(&fx, &fx.leo, "Original post text", Some(fx.cats.id)).await;
        let service = BlogService::new(&fx.db);

        let flow = service
            .edit_post(&fx.leo, post.id, &form("Edited post text", Some(fx.dogs.id)))
            .await
            .unwrap();
        let PostFlow::Persisted(updated) = flow else {
            panic!("expected the post to be saved");
        };
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.text, "Edited post text");
        assert_eq!(updated.group_id, Some(fx.dogs.id));
        assert_eq!(updated.author_id, post.author_id);
        assert_eq!(updated.pub_date, post.pub_date);

        assert_eq!(service.group_posts("cats", None).await.unwrap().page.total, 0);
        assert_eq!(service.group_posts("dogs", None).await.unwrap().page.total, 1);
    }

    #[tokio::test]
    async fn test_edit_post_by_non_author_changes_nothing() {
        let fx = setup().await;
        let post = add_post(&fx, &fx.leo, "Original post text", Some(fx.cats.id)).await;
        let service = BlogService::new(&fx.db);

        let flow = service
            .edit_post(&fx.ann, post.id, &form("Hijacked post text", Some(fx.dogs.id)))
            .await
            .unwrap();
        assert!(matches!(flow, PostFlow::NotAuthor { .. }));

        // Invalid data does not matter either: authorship is checked first.
        let flow = service.edit_post(&fx.ann, post.id, &form("", None)).await.unwrap();
        assert!(matches!(flow, PostFlow::NotAuthor { .. }));

        let stored = PostRepository::new(fx.db.pool())
            .get_by_id(post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, post);
    }

    #[tokio::test]
    async fn test_edit_missing_post() {
        let fx = setup().await;
        let service = BlogService::new(&fx.db);

        let result = service.edit_post(&fx.leo, 42, &form("Some edited text", None)).await;
        assert!(matches!(result, Err(YatubeError::NotFound(_))));
        let result = service.edit_post_form(&fx.leo, 42).await;
        assert!(matches!(result, Err(YatubeError::NotFound(_))));
    }
}
