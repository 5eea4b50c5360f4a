//! Posts App Example using dioxus-data-hooks with an in-memory data provider

use std::{cell::RefCell, rc::Rc};

use dioxus::prelude::*;
use dioxus_data_hooks::prelude::*;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::{Duration, sleep};

/// Represents a single blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishPatch {
    pub published: bool,
}

/// Posts kept in memory, shared by every clone
#[derive(Clone, Default)]
struct MemoryProvider {
    posts: Rc<RefCell<Vec<Post>>>,
}

impl MemoryProvider {
    fn seeded() -> Self {
        let posts = (1..=23)
            .map(|id| Post {
                id,
                title: format!("Post #{id}"),
                published: id % 3 != 0,
            })
            .collect();
        Self {
            posts: Rc::new(RefCell::new(posts)),
        }
    }

    fn find(&self, id: &BaseKey) -> Result<Post, HttpError> {
        let BaseKey::Number(id) = id else {
            return Err(HttpError::new(format!("Invalid id {id}"), 400));
        };
        self.posts
            .borrow()
            .iter()
            .find(|post| post.id == *id)
            .cloned()
            .ok_or_else(|| HttpError::new("Post not found", 404))
    }
}

fn to_record(post: &Post) -> Result<BaseRecord, HttpError> {
    serde_json::to_value(post).map_err(HttpError::encode)
}

impl DataProvider for MemoryProvider {
    fn get_list(&self, params: GetListParams) -> ProviderFuture<GetListResponse> {
        let posts = self.posts.clone();
        async move {
            sleep(Duration::from_millis(300)).await;
            let posts = posts.borrow();
            let total = posts.len() as u64;
            let page = match params.pagination.mode {
                PaginationMode::Server => {
                    let size = params.pagination.page_size as usize;
                    let start = (params.pagination.current as usize - 1) * size;
                    posts.iter().skip(start).take(size).collect::<Vec<_>>()
                }
                _ => posts.iter().collect(),
            };
            let data = page
                .into_iter()
                .map(to_record)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(GetListResponse::new(data, total))
        }
        .boxed_local()
    }

    fn get_one(&self, params: GetOneParams) -> ProviderFuture<GetOneResponse> {
        let found = self.find(&params.id);
        async move {
            sleep(Duration::from_millis(150)).await;
            Ok(RecordResponse {
                data: to_record(&found?)?,
            })
        }
        .boxed_local()
    }

    fn create(&self, params: CreateParams) -> ProviderFuture<CreateResponse> {
        let posts = self.posts.clone();
        async move {
            sleep(Duration::from_millis(400)).await;
            let draft: PostDraft = serde_json::from_value(params.variables)
                .map_err(|error| HttpError::new(error.to_string(), 422))?;
            if draft.title.trim().is_empty() {
                return Err(HttpError::new("Title must not be empty", 422));
            }
            let mut posts = posts.borrow_mut();
            let post = Post {
                id: posts.iter().map(|post| post.id).max().unwrap_or(0) + 1,
                title: draft.title,
                published: false,
            };
            posts.push(post.clone());
            Ok(RecordResponse {
                data: to_record(&post)?,
            })
        }
        .boxed_local()
    }

    fn update(&self, params: UpdateParams) -> ProviderFuture<UpdateResponse> {
        let provider = self.clone();
        async move {
            sleep(Duration::from_millis(250)).await;
            let patch: PublishPatch = serde_json::from_value(params.variables)
                .map_err(|error| HttpError::new(error.to_string(), 422))?;
            let mut post = provider.find(&params.id)?;
            post.published = patch.published;
            if let Some(stored) = provider
                .posts
                .borrow_mut()
                .iter_mut()
                .find(|stored| stored.id == post.id)
            {
                *stored = post.clone();
            }
            Ok(RecordResponse {
                data: to_record(&post)?,
            })
        }
        .boxed_local()
    }

    fn delete_one(&self, params: DeleteOneParams) -> ProviderFuture<DeleteOneResponse> {
        let provider = self.clone();
        async move {
            let post = provider.find(&params.id)?;
            provider
                .posts
                .borrow_mut()
                .retain(|stored| stored.id != post.id);
            Ok(RecordResponse {
                data: to_record(&post)?,
            })
        }
        .boxed_local()
    }

    fn get_api_url(&self) -> String {
        "memory://posts".to_string()
    }
}

impl CustomRequests for MemoryProvider {
    fn custom(&self, params: CustomParams) -> ProviderFuture<CustomResponse> {
        let posts = self.posts.clone();
        async move {
            match (params.method, params.url.as_str()) {
                (HttpMethod::Get, "/stats") => {
                    let posts = posts.borrow();
                    let published = posts.iter().filter(|post| post.published).count();
                    Ok(RecordResponse {
                        data: json!({ "total": posts.len(), "published": published }),
                    })
                }
                (method, url) => Err(HttpError::new(format!("No route for {method} {url}"), 404)),
            }
        }
        .boxed_local()
    }
}

/// Notification sink showing the latest messages on screen
struct Toasts(Signal<Vec<OpenNotificationParams>>);

impl NotificationProvider for Toasts {
    fn open(&self, params: OpenNotificationParams) {
        let mut toasts = self.0;
        toasts.write().push(params);
    }

    fn close(&self, key: &str) {
        let mut toasts = self.0;
        toasts
            .write()
            .retain(|toast| toast.key.as_deref() != Some(key));
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Stats {
    total: u64,
    published: u64,
}

#[component]
fn StatsBar() -> Element {
    let stats = use_custom::<Stats>(UseCustomProps::new("/stats", HttpMethod::Get))?;

    rsx! {
        div { class: "text-sm text-gray-500",
            {
                match &*stats.read() {
                    QueryState::Success(response) => rsx! {
                        "{response.data.published} of {response.data.total} posts published"
                    },
                    QueryState::Error(error) => rsx! { "Stats unavailable: {error}" },
                    _ => rsx! { "Counting posts..." },
                }
            }
        }
    }
}

#[component]
fn NewPost() -> Element {
    let mut title = use_signal(String::new);
    let create = use_create::<Post, PostDraft>(UseCreateParams::new().resource("posts"));
    let state = create.state();

    rsx! {
        form {
            class: "flex gap-2",
            onsubmit: move |event| {
                event.prevent_default();
                let draft = PostDraft {
                    title: title.read().clone(),
                };
                if create.mutate(UseCreateParams::new().values(draft)).is_ok() {
                    title.set(String::new());
                }
            },
            input {
                class: "flex-1 border rounded px-2",
                value: "{title}",
                placeholder: "New post title",
                oninput: move |event| title.set(event.value()),
            }
            button { r#type: "submit", disabled: state.read().is_loading(), "Create" }
        }
    }
}

#[component]
fn PostRow(post: Post) -> Element {
    let update = use_update::<Post, PublishPatch>(
        UseUpdateParams::new().resource("posts").id(post.id),
    );
    let state = update.state();
    let published = post.published;

    rsx! {
        li { class: "flex justify-between py-1",
            span { "{post.title}" }
            button {
                disabled: state.read().is_loading(),
                onclick: move |_| {
                    let patch = PublishPatch { published: !published };
                    let _ = update.mutate(UseUpdateParams::new().values(patch));
                },
                if published { "Unpublish" } else { "Publish" }
            }
        }
    }
}

#[component]
fn PagedPosts() -> Element {
    let mut current = use_signal(|| 1u32);
    let posts = use_list::<Post>(
        UseListProps::new("posts").pagination(Pagination::new().current(current()).page_size(5)),
    )?;

    rsx! {
        section {
            h2 { class: "font-semibold", "Paged" }
            {
                match &*posts.read() {
                    QueryState::Success(page) => rsx! {
                        ul {
                            for post in page.data.iter() {
                                PostRow { key: "{post.id}", post: post.clone() }
                            }
                        }
                        div { class: "flex gap-2",
                            button { disabled: current() == 1, onclick: move |_| current -= 1, "Previous" }
                            span { "Page {current}" }
                            button {
                                disabled: u64::from(current() * 5) >= page.total,
                                onclick: move |_| current += 1,
                                "Next"
                            }
                        }
                    },
                    QueryState::Error(error) => rsx! { "Failed: {error}" },
                    _ => rsx! { "Loading..." },
                }
            }
        }
    }
}

#[component]
fn FeedPosts() -> Element {
    let feed = use_infinite_list::<Post>(
        UseListProps::new("posts").pagination(Pagination::new().page_size(8)),
    )?;
    let state = feed.state();
    let has_more = feed.has_next_page();
    let loading_more = feed.is_fetching_next_page();

    rsx! {
        section {
            h2 { class: "font-semibold", "Feed" }
            {
                match &*state.read() {
                    QueryState::Success(data) => rsx! {
                        ul {
                            for post in data.records() {
                                li { key: "{post.id}", "{post.title}" }
                            }
                        }
                    },
                    QueryState::Error(error) => rsx! { "Failed: {error}" },
                    _ => rsx! { "Loading..." },
                }
            }
            if has_more {
                button {
                    disabled: loading_more,
                    onclick: move |_| feed.fetch_next_page(),
                    if loading_more { "Loading..." } else { "Load more" }
                }
            }
        }
    }
}

/// Root app component
#[component]
pub fn PostsApp() -> Element {
    let toasts = use_signal(Vec::<OpenNotificationParams>::new);
    use_init_data(move || {
        let provider = MemoryProvider::seeded();
        DataConfig::new(DataProviderEntry::new(provider.clone()).with_custom_requests(provider))
        .with_notification(Toasts(toasts))
        .with_error_handler(|error| eprintln!("data provider error: {error}"))
    });

    rsx! {
        div { class: "max-w-3xl mx-auto p-6 space-y-6",
            h1 { class: "text-3xl font-bold", "Posts" }
            StatsBar {}
            NewPost {}
            div { class: "grid grid-cols-2 gap-6",
                PagedPosts {}
                FeedPosts {}
            }
            ul { class: "space-y-1",
                for toast in toasts.read().iter().rev().take(3) {
                    li { class: "text-sm", "{toast.message}" }
                }
            }
        }
    }
}

fn main() {
    dioxus::launch(PostsApp);
}
