#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::Rc,
};

use dioxus_data_hooks::prelude::*;
use futures::FutureExt;
use serde_json::json;

/// Calls seen by [`MockProvider`], per operation
#[derive(Default)]
pub struct Calls {
    pub get_list: Cell<u32>,
    pub get_one: Cell<u32>,
    pub create: Cell<u32>,
    pub update: Cell<u32>,
    pub custom: Cell<u32>,
    pub list_params: RefCell<Vec<GetListParams>>,
}

/// In-memory provider serving `total` numbered records and counting calls at
/// call time
#[derive(Clone)]
pub struct MockProvider {
    pub calls: Rc<Calls>,
    pub total: u64,
    pub failure: Option<HttpError>,
    /// Page through `c<page>` cursor tokens instead of page numbers
    pub cursors: bool,
}

impl MockProvider {
    pub fn new(total: u64) -> Self {
        Self {
            calls: Rc::new(Calls::default()),
            total,
            failure: None,
            cursors: false,
        }
    }

    pub fn with_cursors(total: u64) -> Self {
        Self {
            cursors: true,
            ..Self::new(total)
        }
    }

    pub fn failing(error: HttpError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(0)
        }
    }

    fn respond<T: 'static>(&self, value: T) -> ProviderFuture<T> {
        let failure = self.failure.clone();
        async move {
            match failure {
                Some(error) => Err(error),
                None => Ok(value),
            }
        }
        .boxed_local()
    }
}

impl DataProvider for MockProvider {
    fn get_list(&self, params: GetListParams) -> ProviderFuture<GetListResponse> {
        self.calls.get_list.set(self.calls.get_list.get() + 1);
        let page = match params.cursor.as_deref() {
            Some(token) => token.trim_start_matches('c').parse().unwrap_or(1),
            None => params.pagination.current,
        };
        let page_size = u64::from(params.pagination.page_size);
        let first = u64::from(page - 1) * page_size;
        let last = (first + page_size).min(self.total);
        let data = (first..last).map(|id| json!({ "id": id + 1 })).collect();
        let mut response = GetListResponse::new(data, self.total);
        if self.cursors && last < self.total {
            response.cursor = Some(Cursor {
                next: Some(format!("c{}", page + 1)),
                prev: None,
            });
        }
        self.calls.list_params.borrow_mut().push(params);
        self.respond(response)
    }

    fn get_one(&self, params: GetOneParams) -> ProviderFuture<GetOneResponse> {
        self.calls.get_one.set(self.calls.get_one.get() + 1);
        self.respond(RecordResponse {
            data: json!({ "id": params.id }),
        })
    }

    fn create(&self, params: CreateParams) -> ProviderFuture<CreateResponse> {
        self.calls.create.set(self.calls.create.get() + 1);
        self.respond(RecordResponse {
            data: params.variables,
        })
    }

    fn update(&self, params: UpdateParams) -> ProviderFuture<UpdateResponse> {
        self.calls.update.set(self.calls.update.get() + 1);
        let mut data = params.variables;
        data["id"] = json!(params.id);
        self.respond(RecordResponse { data })
    }

    fn delete_one(&self, params: DeleteOneParams) -> ProviderFuture<DeleteOneResponse> {
        self.respond(RecordResponse {
            data: json!({ "id": params.id }),
        })
    }

    fn get_api_url(&self) -> String {
        "memory://mock".to_string()
    }
}

impl CustomRequests for MockProvider {
    fn custom(&self, params: CustomParams) -> ProviderFuture<CustomResponse> {
        self.calls.custom.set(self.calls.custom.get() + 1);
        self.respond(RecordResponse {
            data: json!({ "url": params.url, "payload": params.payload }),
        })
    }
}

/// Notification sink keeping everything it is asked to show
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub opened: Rc<RefCell<Vec<OpenNotificationParams>>>,
}

impl NotificationProvider for RecordingSink {
    fn open(&self, params: OpenNotificationParams) {
        self.opened.borrow_mut().push(params);
    }

    fn close(&self, key: &str) {
        self.opened
            .borrow_mut()
            .retain(|params| params.key.as_deref() != Some(key));
    }
}

/// Error handler recording every failure it receives
#[derive(Clone, Default)]
pub struct RecordingErrors {
    pub seen: Rc<RefCell<Vec<HttpError>>>,
}

impl RecordingErrors {
    pub fn handler(&self) -> impl Fn(&HttpError) + 'static {
        let seen = self.seen.clone();
        move |error: &HttpError| seen.borrow_mut().push(error.clone())
    }
}

pub fn block_on_test(fut: impl Future<Output = ()>) {
    tokio::runtime::Runtime::new()
        .expect("tokio runtime")
        .block_on(fut);
}
