//! In-process stand-in for the kanban backend, served over a real socket so
//! the reqwest client is exercised end to end.
#![allow(dead_code)]

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use kanban_client::client::ApiClient;
use kanban_client::models::{
    Board, Column, Member, Notification, NotificationKind, Priority, Role, Task, TaskStatus, User,
};
use kanban_client::store::Store;
use kanban_client::validation::ValidationMode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Shared = Arc<Mutex<Db>>;
type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

#[derive(Default)]
pub struct Db {
    pub users: Vec<(User, String)>,
    pub tokens: HashMap<String, String>,
    pub boards: Vec<Board>,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
    pub members: Vec<Member>,
    pub notifications: Vec<Notification>,
    /// "METHOD /path" of every request received.
    pub requests: Vec<String>,
    /// One-shot failure: method, path, status.
    pub fail_next: Option<(String, String, u16)>,
    /// Served instead of the real column list when set.
    pub raw_columns: Option<Value>,
    pub delay: Option<Duration>,
}

pub struct MockServer {
    pub base_url: String,
    pub db: Shared,
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn authorize(db: &Db, headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| db.tokens.get(token).cloned())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

fn renumber_column(db: &mut Db, column_id: &str) {
    let mut tasks: Vec<&mut Task> = db.tasks.iter_mut().filter(|t| t.column_id == column_id).collect();
    tasks.sort_by_key(|t| t.position);
    for (i, task) in tasks.into_iter().enumerate() {
        task.position = i as i32;
    }
}

// * Server ...................................................................

impl MockServer {
    pub async fn start() -> Self {
        let db: Shared = Arc::new(Mutex::new(Db::default()));
        let app = Router::new()
            .nest("/api", routes())
            .layer(middleware::from_fn_with_state(db.clone(), record))
            .with_state(db.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            base_url: format!("http://{}/api", addr),
            db,
        }
    }

    pub fn db(&self) -> std::sync::MutexGuard<'_, Db> {
        self.db.lock().unwrap()
    }

    /// Registers a user and returns a valid token for them.
    pub fn register(&self, name: &str, email: &str, password: &str) -> (User, String) {
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
        };
        let token = new_id();
        let mut db = self.db();
        db.users.push((user.clone(), password.to_string()));
        db.tokens.insert(token.clone(), user.id.clone());
        (user, token)
    }

    pub fn client(&self, token: &str) -> ApiClient {
        ApiClient::new(&self.base_url)
            .with_token(Some(token.to_string()))
            .with_validation(ValidationMode::Strict)
    }

    pub fn store(&self, token: &str) -> Store {
        Store::new(self.client(token))
    }

    pub fn seed_board(&self, owner: &User, title: &str) -> Board {
        let board = Board {
            id: new_id(),
            title: title.to_string(),
            description: None,
            owner: Some(owner.id.clone()),
            members: vec![owner.id.clone()],
            priority: Priority::Medium,
            starred: false,
            color: None,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        self.db().boards.push(board.clone());
        board
    }

    pub fn seed_column(&self, board: &Board, title: &str, position: i32) -> Column {
        let column = Column {
            id: new_id(),
            board_id: board.id.clone(),
            title: title.to_string(),
            color: None,
            position,
        };
        self.db().columns.push(column.clone());
        column
    }

    pub fn seed_task(&self, column: &Column, title: &str, position: i32) -> Task {
        let task = Task {
            id: new_id(),
            column_id: column.id.clone(),
            board_id: column.board_id.clone(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            assignees: vec![],
            tags: vec![],
            position,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        self.db().tasks.push(task.clone());
        task
    }

    pub fn seed_notification(&self, user: &User, title: &str, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: new_id(),
            user_id: Some(user.id.clone()),
            board_id: None,
            title: title.to_string(),
            message: String::new(),
            kind,
            read: false,
            created_at: Some(Utc::now()),
        };
        self.db().notifications.push(notification.clone());
        notification
    }

    pub fn fail_next(&self, method: &str, path: &str, status: u16) {
        self.db().fail_next = Some((method.to_string(), format!("/api{}", path), status));
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        let needle = format!("{} /api{}", method, path);
        self.db().requests.iter().filter(|r| **r == needle).count()
    }

    pub fn revoke_tokens(&self) {
        self.db().tokens.clear();
    }
}

async fn record(State(db): State<Shared>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let (failure, delay) = {
        let mut db = db.lock().unwrap();
        db.requests.push(format!("{} {}", method, path));
        let failure = match &db.fail_next {
            Some((m, p, status)) if *m == method && *p == path => {
                let status = *status;
                db.fail_next = None;
                Some(status)
            }
            _ => None,
        };
        (failure, db.delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap();
        return error(status, "Injected failure").into_response();
    }
    next.run(request).await
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/auth/signin", post(sign_in))
        .route("/auth/signup", post(sign_up))
        .route("/auth/profile", get(profile))
        .route("/boards", get(list_boards).post(create_board))
        .route("/boards/:id", get(get_board).put(update_board).delete(delete_board))
        .route("/boards/:id/star", post(star_board))
        .route("/columns", post(create_column))
        .route("/columns/reorder", post(reorder_columns))
        .route("/columns/:id", get(list_columns).put(update_column).delete(delete_column))
        .route("/tasks", post(create_task))
        .route("/tasks/getAllTasks", get(all_tasks))
        .route("/tasks/move", post(move_task))
        .route("/tasks/details/:id", get(task_details))
        .route("/tasks/:id", get(list_tasks).put(update_task).delete(delete_task))
        .route("/tasks/:id/assignees", post(add_assignee))
        .route("/tasks/:id/assignees/:user", axum::routing::delete(remove_assignee))
        .route("/tasks/:id/tags", post(add_tag))
        .route("/tasks/:id/tags/:tag", axum::routing::delete(remove_tag))
        .route("/members/:board", get(list_members).post(add_member))
        .route("/members/:board/:user", put(update_member).delete(remove_member))
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", put(read_all))
        .route("/notifications/:id", axum::routing::delete(delete_notification))
        .route("/notifications/:id/read", put(read_notification))
}

// * Auth .....................................................................

async fn sign_in(State(db): State<Shared>, Json(body): Json<Value>) -> ApiResult<Json<Value>> {
    let mut db = db.lock().unwrap();
    let user = db
        .users
        .iter()
        .find(|(u, p)| u.email == body["email"] && *p == body["password"])
        .map(|(u, _)| u.clone())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = new_id();
    db.tokens.insert(token.clone(), user.id.clone());
    Ok(Json(json!({ "token": token, "user": user })))
}

async fn sign_up(State(db): State<Shared>, Json(body): Json<Value>) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut db = db.lock().unwrap();
    if db.users.iter().any(|(u, _)| u.email == body["email"]) {
        return Err(error(StatusCode::CONFLICT, "Email already registered"));
    }
    let user = User {
        id: new_id(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email: body["email"].as_str().unwrap_or_default().to_string(),
    };
    let token = new_id();
    db.users.push((user.clone(), body["password"].as_str().unwrap_or_default().to_string()));
    db.tokens.insert(token.clone(), user.id.clone());
    Ok((StatusCode::CREATED, Json(json!({ "token": token, "user": user }))))
}

async fn profile(State(db): State<Shared>, headers: HeaderMap) -> ApiResult<Json<User>> {
    let db = db.lock().unwrap();
    let uid = authorize(&db, &headers)?;
    db.users
        .iter()
        .find(|(u, _)| u.id == uid)
        .map(|(u, _)| Json(u.clone()))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "User not found"))
}

// * Boards ...................................................................

async fn list_boards(State(db): State<Shared>, headers: HeaderMap) -> ApiResult<Json<Vec<Board>>> {
    let db = db.lock().unwrap();
    let uid = authorize(&db, &headers)?;
    Ok(Json(
        db.boards
            .iter()
            .filter(|b| b.owner.as_deref() == Some(uid.as_str()) || b.members.contains(&uid))
            .cloned()
            .collect(),
    ))
}

async fn create_board(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let mut db = db.lock().unwrap();
    let uid = authorize(&db, &headers)?;
    let title = body["title"].as_str().unwrap_or_default();
    if title.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "title is required"));
    }
    let board = Board {
        id: new_id(),
        title: title.to_string(),
        description: body["description"].as_str().map(str::to_string),
        owner: Some(uid.clone()),
        members: vec![uid],
        priority: serde_json::from_value(body["priority"].clone()).unwrap_or_default(),
        starred: false,
        color: body["color"].as_str().map(str::to_string),
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    };
    db.boards.push(board.clone());
    Ok((StatusCode::CREATED, Json(board)))
}

fn find_board<'a>(db: &'a mut Db, id: &str) -> ApiResult<&'a mut Board> {
    db.boards
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Board not found"))
}

async fn get_board(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<Json<Board>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    Ok(Json(find_board(&mut db, &id)?.clone()))
}

async fn update_board(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Board>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let board = find_board(&mut db, &id)?;
    if let Some(title) = body["title"].as_str() {
        board.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        board.description = Some(description.to_string());
    }
    if let Ok(priority) = serde_json::from_value::<Priority>(body["priority"].clone()) {
        board.priority = priority;
    }
    if let Some(color) = body["color"].as_str() {
        board.color = Some(color.to_string());
    }
    board.updated_at = Some(Utc::now());
    Ok(Json(board.clone()))
}

async fn delete_board(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    find_board(&mut db, &id)?;
    db.boards.retain(|b| b.id != id);
    db.columns.retain(|c| c.board_id != id);
    db.tasks.retain(|t| t.board_id != id);
    db.members.retain(|m| m.board_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn star_board(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<Json<Board>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let board = find_board(&mut db, &id)?;
    board.starred = !board.starred;
    Ok(Json(board.clone()))
}

// * Columns ..................................................................

async fn list_columns(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(board_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let db = db.lock().unwrap();
    authorize(&db, &headers)?;
    if let Some(raw) = &db.raw_columns {
        return Ok(Json(raw.clone()));
    }
    let mut columns: Vec<Column> = db.columns.iter().filter(|c| c.board_id == board_id).cloned().collect();
    columns.sort_by_key(|c| c.position);
    Ok(Json(json!(columns)))
}

async fn create_column(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let column = Column {
        id: new_id(),
        board_id: body["board_id"].as_str().unwrap_or_default().to_string(),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        color: body["color"].as_str().map(str::to_string),
        position: body["position"].as_i64().unwrap_or_default() as i32,
    };
    db.columns.push(column.clone());
    Ok((StatusCode::CREATED, Json(column)))
}

async fn update_column(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Column>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let column = db
        .columns
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Column not found"))?;
    if let Some(title) = body["title"].as_str() {
        column.title = title.to_string();
    }
    if let Some(color) = body["color"].as_str() {
        column.color = Some(color.to_string());
    }
    Ok(Json(column.clone()))
}

async fn delete_column(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    db.columns.retain(|c| c.id != id);
    db.tasks.retain(|t| t.column_id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_columns(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let updates = body["columns"].as_array().cloned().unwrap_or_default();
    for update in updates {
        if let Some(column) = db.columns.iter_mut().find(|c| c.id == update["id"]) {
            column.position = update["position"].as_i64().unwrap_or_default() as i32;
        }
    }
    Ok(Json(json!({ "message": "Columns reordered" })))
}

// * Tasks ....................................................................

fn find_task<'a>(db: &'a mut Db, id: &str) -> ApiResult<&'a mut Task> {
    db.tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Task not found"))
}

async fn create_task(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task = Task {
        id: new_id(),
        column_id: body["column_id"].as_str().unwrap_or_default().to_string(),
        board_id: body["board_id"].as_str().unwrap_or_default().to_string(),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().map(str::to_string),
        status: serde_json::from_value(body["status"].clone()).unwrap_or_default(),
        priority: serde_json::from_value(body["priority"].clone()).unwrap_or_default(),
        due_date: serde_json::from_value(body["due_date"].clone()).unwrap_or_default(),
        assignees: serde_json::from_value(body["assignees"].clone()).unwrap_or_default(),
        tags: serde_json::from_value(body["tags"].clone()).unwrap_or_default(),
        position: body["position"].as_i64().unwrap_or_default() as i32,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    };
    db.tasks.push(task.clone());
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_tasks(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(column_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let mut tasks: Vec<Task> = db.tasks.iter().filter(|t| t.column_id == column_id).cloned().collect();
    tasks.sort_by_key(|t| t.position);
    Ok(Json(tasks))
}

async fn all_tasks(State(db): State<Shared>, headers: HeaderMap) -> ApiResult<Json<Vec<Task>>> {
    let db = db.lock().unwrap();
    authorize(&db, &headers)?;
    Ok(Json(db.tasks.clone()))
}

async fn task_details(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    Ok(Json(find_task(&mut db, &id)?.clone()))
}

async fn update_task(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task = find_task(&mut db, &id)?;
    if let Some(title) = body["title"].as_str() {
        task.title = title.to_string();
    }
    if let Some(description) = body["description"].as_str() {
        task.description = Some(description.to_string());
    }
    if let Ok(status) = serde_json::from_value::<TaskStatus>(body["status"].clone()) {
        task.status = status;
    }
    if let Ok(priority) = serde_json::from_value::<Priority>(body["priority"].clone()) {
        task.priority = priority;
    }
    task.updated_at = Some(Utc::now());
    Ok(Json(task.clone()))
}

async fn delete_task(State(db): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    find_task(&mut db, &id)?;
    db.tasks.retain(|t| t.id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn move_task(State(db): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task_id = body["task_id"].as_str().unwrap_or_default().to_string();
    let target = body["target_column_id"].as_str().unwrap_or_default().to_string();
    let new_position = body["new_position"].as_i64().unwrap_or_default() as i32;
    let board_id = db
        .columns
        .iter()
        .find(|c| c.id == target)
        .map(|c| c.board_id.clone())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Column not found"))?;

    let source = find_task(&mut db, &task_id)?.column_id.clone();
    // Park the task outside both lists, close the gap, then open one
    find_task(&mut db, &task_id)?.position = i32::MAX;
    renumber_column(&mut db, &source);
    for task in db.tasks.iter_mut().filter(|t| t.column_id == target && t.id != task_id) {
        if task.position >= new_position {
            task.position += 1;
        }
    }
    let task = find_task(&mut db, &task_id)?;
    task.column_id = target.clone();
    task.board_id = board_id;
    task.position = new_position;
    let moved = task.clone();
    renumber_column(&mut db, &target);
    Ok(Json(moved))
}

async fn add_assignee(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task = find_task(&mut db, &id)?;
    let user = body["user_id"].as_str().unwrap_or_default().to_string();
    if !task.assignees.contains(&user) {
        task.assignees.push(user);
    }
    Ok(Json(task.clone()))
}

async fn remove_assignee(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path((id, user)): Path<(String, String)>,
) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task = find_task(&mut db, &id)?;
    task.assignees.retain(|a| *a != user);
    Ok(Json(task.clone()))
}

async fn add_tag(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task = find_task(&mut db, &id)?;
    let tag = body["tag"].as_str().unwrap_or_default().to_string();
    if !task.tags.contains(&tag) {
        task.tags.push(tag);
    }
    Ok(Json(task.clone()))
}

async fn remove_tag(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path((id, tag)): Path<(String, String)>,
) -> ApiResult<Json<Task>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let task = find_task(&mut db, &id)?;
    task.tags.retain(|t| *t != tag);
    Ok(Json(task.clone()))
}

// * Members ..................................................................

async fn list_members(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(board): Path<String>,
) -> ApiResult<Json<Vec<Member>>> {
    let db = db.lock().unwrap();
    authorize(&db, &headers)?;
    Ok(Json(db.members.iter().filter(|m| m.board_id == board).cloned().collect()))
}

async fn add_member(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(board): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Member>)> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let user = db
        .users
        .iter()
        .find(|(u, _)| u.email == body["email"])
        .map(|(u, _)| u.clone())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "User not found"))?;
    let member = Member {
        user_id: user.id.clone(),
        board_id: board.clone(),
        name: Some(user.name),
        email: Some(user.email),
        role: serde_json::from_value(body["role"].clone()).unwrap_or_default(),
    };
    db.members.push(member.clone());
    if let Ok(board) = find_board(&mut db, &board) {
        board.members.push(user.id);
    }
    Ok((StatusCode::CREATED, Json(member)))
}

async fn update_member(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path((board, user)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Member>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let member = db
        .members
        .iter_mut()
        .find(|m| m.board_id == board && m.user_id == user)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Member not found"))?;
    member.role = serde_json::from_value::<Role>(body["role"].clone())
        .map_err(|_| error(StatusCode::BAD_REQUEST, "invalid role"))?;
    Ok(Json(member.clone()))
}

async fn remove_member(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path((board, user)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    db.members.retain(|m| !(m.board_id == board && m.user_id == user));
    if let Ok(board) = find_board(&mut db, &board) {
        board.members.retain(|m| *m != user);
    }
    Ok(StatusCode::NO_CONTENT)
}

// * Notifications ............................................................

async fn list_notifications(State(db): State<Shared>, headers: HeaderMap) -> ApiResult<Json<Vec<Notification>>> {
    let db = db.lock().unwrap();
    let uid = authorize(&db, &headers)?;
    Ok(Json(
        db.notifications
            .iter()
            .filter(|n| n.user_id.as_deref() == Some(uid.as_str()))
            .cloned()
            .collect(),
    ))
}

async fn read_notification(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    let notification = db
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Notification not found"))?;
    notification.read = true;
    Ok(Json(json!(notification.clone())))
}

async fn read_all(State(db): State<Shared>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let mut db = db.lock().unwrap();
    let uid = authorize(&db, &headers)?;
    for n in db.notifications.iter_mut().filter(|n| n.user_id.as_deref() == Some(uid.as_str())) {
        n.read = true;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_notification(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut db = db.lock().unwrap();
    authorize(&db, &headers)?;
    db.notifications.retain(|n| n.id != id);
    Ok(StatusCode::NO_CONTENT)
}
