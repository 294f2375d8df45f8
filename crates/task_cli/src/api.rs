use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use task_core::{AppError, NewTask, OwnerId, Task, TaskPatch};
use thiserror::Error;

pub const IDENTITY_HEADER: &str = "x-user-id";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api url {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{}", .0.message())]
    Local(#[from] AppError),
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "validation_error",
            Self::Transport(_) => "transport_error",
            Self::Api { status: 400, .. } => "validation_error",
            Self::Api { status: 401, .. } => "unauthenticated",
            Self::Api { status: 404, .. } => "not_found",
            Self::Api { .. } => "unexpected_error",
            Self::Local(err) => err.code(),
        }
    }
}

pub trait TaskApi {
    fn list(&self) -> Result<Vec<Task>, ClientError>;
    fn create(&self, request: &NewTask) -> Result<Task, ClientError>;
    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, ClientError>;
    fn delete(&self, id: &str) -> Result<String, ClientError>;
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
}

impl HttpTaskApi {
    pub fn new(base_url: &str, owner: &OwnerId) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| ClientError::InvalidUrl(format!("'{base_url}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        let owner_value = HeaderValue::from_str(owner.as_str())
            .map_err(|err| AppError::validation(format!("invalid user id: {err}")))?;
        headers.insert(HeaderName::from_static(IDENTITY_HEADER), owner_value);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn task_url(&self, id: &str) -> Result<Url, ClientError> {
        // Dot segments would be resolved away, turning the call into one on `/tasks`.
        if matches!(id, "." | "..") {
            return Err(AppError::not_found("Task not found").into());
        }
        Ok(self.url(&["tasks", id]))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send()?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "api response");

        if status.is_success() {
            return Ok(response.json()?);
        }

        let message = match response.json::<MessageBody>() {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl TaskApi for HttpTaskApi {
    fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.send(self.client.get(self.url(&["tasks"])))
    }

    fn create(&self, request: &NewTask) -> Result<Task, ClientError> {
        self.send(self.client.post(self.url(&["tasks"])).json(request))
    }

    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.send(self.client.put(self.task_url(id)?).json(patch))
    }

    fn delete(&self, id: &str) -> Result<String, ClientError> {
        let body: MessageBody = self.send(self.client.delete(self.task_url(id)?))?;
        Ok(body.message)
    }
}
