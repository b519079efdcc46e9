use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use storage_glue_core::error::{classify_error_code, classify_http_status, ErrorKind, ServiceError};

/// Converts an SDK failure into a `ServiceError`.
///
/// S3 and SNS share the smithy runtime types, so one mapping serves both
/// clients.
pub(crate) fn map_sdk_error<E>(operation: &'static str, error: SdkError<E, HttpResponse>) -> ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = error.code().map(str::to_string);
    let kind = match &error {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => ErrorKind::Transient,
        _ => match code.as_deref().map(classify_error_code) {
            Some(kind) if kind != ErrorKind::Unknown => kind,
            _ => error
                .raw_response()
                .map(|response| classify_http_status(response.status().as_u16()))
                .unwrap_or(ErrorKind::Unknown),
        },
    };
    let message = error
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&error).to_string());

    let service_error = ServiceError::new(kind, operation, message);
    match code {
        Some(code) => service_error.with_code(code),
        None => service_error,
    }
}
