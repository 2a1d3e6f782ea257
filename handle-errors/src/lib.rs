use serde::Serialize;
use warp::{
    Rejection, Reply,
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{MethodNotAllowed, Reject},
};

use tracing::{Level, event, instrument};

#[derive(Debug)]
pub enum Error {
    MissingParameters(&'static str),
    InvalidInput(String),
    QuestionNotFound(i32),
    CategoryNotFound(i32),
    NoQuestions,
    NoCategories,
    CannotDelete(i32),
    DatabaseQueryError(sqlx::Error),
    MigrationError(sqlx::migrate::MigrateError),
    ConfigError(config::ConfigError),
    SeedFileError(std::io::Error),
    SeedFormatError(serde_json::Error),
    AddressError(std::net::AddrParseError),
}

/// 실패한 호출이 클라이언트에게 드러내는 네 가지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UnprocessableInput,
    MethodNotAllowed,
    InternalError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::UnprocessableInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingParameters(_) | Error::InvalidInput(_) => ErrorKind::UnprocessableInput,
            Error::QuestionNotFound(_)
            | Error::CategoryNotFound(_)
            | Error::NoQuestions
            | Error::NoCategories => ErrorKind::NotFound,
            Error::CannotDelete(_) => ErrorKind::MethodNotAllowed,
            Error::DatabaseQueryError(_)
            | Error::MigrationError(_)
            | Error::ConfigError(_)
            | Error::SeedFileError(_)
            | Error::SeedFormatError(_)
            | Error::AddressError(_) => ErrorKind::InternalError,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &*self {
            Error::MissingParameters(name) => {
                write!(f, "Missing parameter: {}", name)
            }
            Error::InvalidInput(reason) => {
                write!(f, "Invalid input: {}", reason)
            }
            Error::QuestionNotFound(id) => {
                write!(f, "Question {} not found", id)
            }
            Error::CategoryNotFound(id) => {
                write!(f, "No questions found for category {}", id)
            }
            Error::NoQuestions => {
                write!(f, "No questions available")
            }
            Error::NoCategories => {
                write!(f, "No categories available")
            }
            Error::CannotDelete(id) => {
                write!(f, "Question {} cannot be deleted", id)
            }
            Error::DatabaseQueryError(_) => {
                write!(f, "Cannot query the question store")
            }
            Error::MigrationError(err) => {
                write!(f, "Cannot run migrations: {}", err)
            }
            Error::ConfigError(err) => {
                write!(f, "Invalid configuration: {}", err)
            }
            Error::SeedFileError(err) => {
                write!(f, "Cannot read seed file: {}", err)
            }
            Error::SeedFormatError(err) => {
                write!(f, "Cannot parse seed data: {}", err)
            }
            Error::AddressError(err) => {
                write!(f, "Invalid listen address: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    success: bool,
    error: u16,
    message: String,
}

fn error_reply(status: StatusCode, message: String) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        }),
        status,
    )
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        let kind = error.kind();
        match kind {
            ErrorKind::InternalError => event!(Level::ERROR, "{:?}", error),
            _ => event!(Level::WARN, "{}", error),
        }
        Ok(error_reply(kind.status(), error.to_string()))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "CORS forbidden error: {}", error);
        Ok(error_reply(StatusCode::FORBIDDEN, error.to_string()))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::ERROR, "Cannot deserialize request body: {}", error);
        Ok(error_reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            error.to_string(),
        ))
    } else if r.find::<MethodNotAllowed>().is_some() {
        event!(Level::WARN, "Method not allowed");
        Ok(error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed for this resource".to_string(),
        ))
    } else if r.is_not_found() {
        event!(Level::WARN, "Requested route was not found");
        Ok(error_reply(
            StatusCode::NOT_FOUND,
            "Route not found".to_string(),
        ))
    } else {
        event!(Level::ERROR, "Unhandled rejection: {:?}", r);
        Ok(error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        ))
    }
}
