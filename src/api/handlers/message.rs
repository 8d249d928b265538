/*
 * Responsibility
 * - GET /message (SCOPE_message:read), POST /message (SCOPE_message:write)
 * - scope チェックは middleware 側。ここは固定レスポンスのみ
 */

pub async fn read_message() -> &'static str {
    "secret message"
}

pub async fn create_message(body: String) -> String {
    tracing::debug!(len = body.len(), "message created");
    format!("Message was created. Content: {body}")
}
