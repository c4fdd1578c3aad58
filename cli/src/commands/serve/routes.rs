//! # Editor API Routes
//!
//! File: cli/src/commands/serve/routes.rs
//!
//! ## Overview
//!
//! The `/AAZ/Editor` HTTP API. Every handler takes the server-wide lock and
//! runs its `WorkspaceManager` work on the blocking pool: open the named
//! workspace, perform one operation, save when something changed. The
//! answer is JSON.
//!
//! ## Routes
//!
//! ```text
//! GET|POST     /AAZ/Editor/Workspaces
//! GET|DELETE   /AAZ/Editor/Workspaces/{name}
//! POST         /AAZ/Editor/Workspaces/{name}/Generate
//! GET|PATCH|DELETE
//!              /AAZ/Editor/Workspaces/{name}/CommandTree/Nodes/aaz/{names...}
//! POST         .../Nodes/aaz/{names...}/Rename
//! GET          .../Nodes/aaz/{names...}/Resources
//! POST         .../Nodes/aaz/{names...}/AddSwagger
//! GET          .../Nodes/aaz/{names...}/Leaves/{leaf}
//! POST         .../Nodes/aaz/{names...}/Leaves/{leaf}/Rename
//! POST         /AAZ/Editor/Workspaces/{name}/Resources/Merge
//! DELETE       /AAZ/Editor/Workspaces/{name}/Resources/{b64 id}/V/{b64 version}
//! ```
//!
//! Node paths are matched with a single wildcard route and dispatched by
//! `parse_node_route`. Command and group names are lowercase, so the
//! capitalized action segments cannot collide with them.
//!
//! ## Errors
//!
//! Failures are returned as `{"message": "..."}`. The status comes from the
//! `EditorError` found in the error chain: 400 for invalid usage, 404 for
//! missing resources, 409 for conflicts, 500 for everything else.
//!
use crate::common::encoding::b64decode_str;
use crate::core::error::{EditorError, Result};
use crate::editor::WorkspaceManager;
use crate::generator;
use crate::model::{Help, Plane, Stage, COMMAND_TREE_ROOT_NAME};
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const API_PREFIX: &str = "/AAZ/Editor";

/// State shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    pub workspaces_dir: PathBuf,
    pub aaz_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    /// Serializes workspace operations.
    pub lock: Mutex<()>,
}

impl AppState {
    pub fn new(workspaces_dir: PathBuf, aaz_dir: PathBuf, output_dir: Option<PathBuf>) -> Self {
        Self {
            workspaces_dir,
            aaz_dir,
            output_dir,
            lock: Mutex::new(()),
        }
    }

    fn open(&self, name: &str) -> Result<WorkspaceManager> {
        Ok(WorkspaceManager::open(&self.workspaces_dir, name)?.with_aaz_dir(&self.aaz_dir))
    }

    fn load(&self, name: &str) -> Result<WorkspaceManager> {
        let mut manager = self.open(name)?;
        manager.load()?;
        Ok(manager)
    }
}

pub type SharedState = Arc<AppState>;

/// An error leaving a handler.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.downcast_ref::<EditorError>() {
            Some(e @ EditorError::InvalidApiUsage(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            Some(e @ EditorError::ResourceNotFound(_)) => (StatusCode::NOT_FOUND, e.to_string()),
            Some(e @ EditorError::ResourceConflict(_)) => (StatusCode::CONFLICT, e.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", self.0)),
        };
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status, message);
        }
        (status, Json(json!({ "message": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "Method not allowed" })),
    )
        .into_response()
}

fn parse_body<T: DeserializeOwned>(body: &Bytes, message: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        EditorError::invalid(message).into()
    })
}

pub fn workspace_url(name: &str) -> String {
    format!("{}/Workspaces/{}", API_PREFIX, name)
}

/// The workspace document plus `url`, `folder` and `updated`.
fn workspace_response(manager: &WorkspaceManager) -> Result<Value> {
    let mut value = serde_json::to_value(manager.ws()?)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("url".into(), json!(workspace_url(&manager.name)));
        obj.insert("folder".into(), json!(manager.folder));
        obj.insert("updated".into(), json!(manager.updated()?));
    }
    Ok(value)
}

/// Target of a request below `.../CommandTree/Nodes/`.
#[derive(Debug, PartialEq)]
enum NodeRoute {
    Node(Vec<String>),
    Rename(Vec<String>),
    Resources(Vec<String>),
    AddSwagger(Vec<String>),
    Leaf(Vec<String>, String),
    LeafRename(Vec<String>, String),
}

const ACTION_SEGMENTS: [&str; 4] = ["Rename", "Resources", "AddSwagger", "Leaves"];

fn parse_node_route(path: &str) -> Result<NodeRoute> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let rest = match segments.split_first() {
        Some((first, rest)) if *first == COMMAND_TREE_ROOT_NAME => rest,
        _ => anyhow::bail!(EditorError::not_found("Command group not exist")),
    };
    let split = rest
        .iter()
        .position(|s| ACTION_SEGMENTS.contains(s))
        .unwrap_or(rest.len());
    let names: Vec<String> = rest[..split].iter().map(|s| s.to_string()).collect();
    let route = match &rest[split..] {
        [] => NodeRoute::Node(names),
        ["Rename"] => NodeRoute::Rename(names),
        ["Resources"] => NodeRoute::Resources(names),
        ["AddSwagger"] => NodeRoute::AddSwagger(names),
        ["Leaves", leaf] => NodeRoute::Leaf(names, leaf.to_string()),
        ["Leaves", leaf, "Rename"] => NodeRoute::LeafRename(names, leaf.to_string()),
        _ => anyhow::bail!(EditorError::not_found("Not found")),
    };
    Ok(route)
}

fn require_node(manager: &WorkspaceManager, names: &[String]) -> Result<()> {
    if manager.find_command_tree_node(names).is_none() {
        anyhow::bail!(EditorError::not_found("Command group not exist"));
    }
    Ok(())
}

fn require_leaf(manager: &WorkspaceManager, names: &[String], leaf: &str) -> Result<()> {
    if manager.find_command_tree_leaf(names, leaf).is_none() {
        anyhow::bail!(EditorError::not_found("Command not exist"));
    }
    Ok(())
}

fn node_response(manager: &WorkspaceManager, names: &[String]) -> Result<Response> {
    let node = manager
        .find_command_tree_node(names)
        .ok_or_else(|| EditorError::not_found("Command group not exist"))?;
    Ok(Json(serde_json::to_value(node)?).into_response())
}

// --- Request bodies ---

#[derive(Deserialize)]
struct CreateWorkspaceBody {
    name: String,
    plane: String,
}

#[derive(Deserialize)]
struct PatchNodeBody {
    help: Option<Help>,
    stage: Option<Stage>,
}

#[derive(Deserialize)]
struct RenameBody {
    name: String,
}

#[derive(Deserialize)]
struct AddSwaggerBody {
    module: String,
    version: String,
    resources: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceRef {
    resource_id: String,
    version: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MergeBody {
    main_resource: ResourceRef,
    plus_resource: ResourceRef,
}

fn split_new_name(name: &str) -> Result<Vec<String>> {
    if name.is_empty() {
        anyhow::bail!(EditorError::invalid("Invalid request"));
    }
    Ok(name.split(' ').map(str::to_string).collect())
}

/// Runs `work` on the blocking pool while holding the workspace lock.
async fn run_locked<T, F>(state: &SharedState, work: F) -> ApiResult<T>
where
    F: FnOnce(&AppState) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let _guard = state.lock.lock().await;
    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || work(&state))
        .await
        .context("Workspace task failed")?;
    Ok(result?)
}

// --- Workspaces ---

async fn list_workspaces(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let workspaces =
        run_locked(&state, |state| WorkspaceManager::list_workspaces(&state.workspaces_dir)).await?;
    let result: Vec<Value> = workspaces
        .into_iter()
        .map(|ws| {
            let url = workspace_url(&ws.name);
            let mut value = json!(ws);
            if let Some(obj) = value.as_object_mut() {
                obj.insert("url".into(), json!(url));
            }
            value
        })
        .collect();
    Ok(Json(Value::Array(result)))
}

async fn create_workspace(State(state): State<SharedState>, body: Bytes) -> ApiResult<Json<Value>> {
    let body: CreateWorkspaceBody = parse_body(&body, "Invalid request body")?;
    let plane: Plane = body.plane.parse().map_err(EditorError::InvalidApiUsage)?;
    let value = run_locked(&state, move |state| {
        let mut manager = WorkspaceManager::new(&state.workspaces_dir, &body.name, plane)?
            .with_aaz_dir(&state.aaz_dir);
        manager.save()?;
        workspace_response(&manager)
    })
    .await?;
    Ok(Json(value))
}

async fn get_workspace(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    let value = run_locked(&state, move |state| workspace_response(&state.load(&name)?)).await?;
    Ok(Json(value))
}

async fn delete_workspace(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    if run_locked(&state, move |state| state.open(&name)?.delete()).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

async fn generate_workspace(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    let value = run_locked(&state, move |state| {
        let manager = state.load(&name)?;
        let out_dir = state
            .output_dir
            .clone()
            .unwrap_or_else(|| manager.folder.join("Generated"));
        let files = generator::generate_workspace(&manager, &out_dir)?;
        info!("Generated {} file(s) for workspace '{}'", files.len(), name);
        Ok(json!({ "folder": out_dir, "files": files }))
    })
    .await?;
    Ok(Json(value))
}

// --- Command tree ---

async fn node_get(
    State(state): State<SharedState>,
    Path((name, node_path)): Path<(String, String)>,
) -> ApiResult<Response> {
    let route = parse_node_route(&node_path)?;
    run_locked(&state, move |state| match route {
        NodeRoute::Node(names) => {
            let manager = state.load(&name)?;
            node_response(&manager, &names)
        }
        NodeRoute::Resources(names) => {
            let manager = state.load(&name)?;
            require_node(&manager, &names)?;
            let resources = manager.get_resources(&names)?;
            Ok(Json(serde_json::to_value(resources)?).into_response())
        }
        NodeRoute::Leaf(names, leaf_name) => {
            let manager = state.load(&name)?;
            let leaf = manager
                .find_command_tree_leaf(&names, &leaf_name)
                .ok_or_else(|| EditorError::not_found("Command not exist"))?;
            let command = manager.find_command(leaf)?;
            let mut value = serde_json::to_value(command)?;
            if let Some(obj) = value.as_object_mut() {
                obj.remove("name");
                obj.insert("names".into(), json!(leaf.names));
            }
            Ok(Json(value).into_response())
        }
        _ => Ok(method_not_allowed()),
    })
    .await
}

async fn node_patch(
    State(state): State<SharedState>,
    Path((name, node_path)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Response> {
    let NodeRoute::Node(names) = parse_node_route(&node_path)? else {
        return Ok(method_not_allowed());
    };
    run_locked(&state, move |state| {
        let mut manager = state.load(&name)?;
        require_node(&manager, &names)?;
        let body: PatchNodeBody = parse_body(&body, "Invalid request")?;
        if let Some(help) = body.help {
            manager.update_command_tree_node_help(&names, help)?;
        }
        if let Some(stage) = body.stage {
            let current = manager.find_command_tree_node(&names).map(|n| n.stage);
            if current != Some(stage) {
                manager.update_command_tree_node_stage(&names, stage)?;
            }
        }
        manager.save()?;
        node_response(&manager, &names)
    })
    .await
}

async fn node_delete(
    State(state): State<SharedState>,
    Path((name, node_path)): Path<(String, String)>,
) -> ApiResult<Response> {
    let NodeRoute::Node(names) = parse_node_route(&node_path)? else {
        return Ok(method_not_allowed());
    };
    run_locked(&state, move |state| {
        let mut manager = state.load(&name)?;
        require_node(&manager, &names)?;
        if names.is_empty() {
            anyhow::bail!(EditorError::invalid("Not support to delete command tree root"));
        }
        if manager.delete_command_tree_node(&names)? {
            manager.save()?;
            Ok(StatusCode::OK.into_response())
        } else {
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    })
    .await
}

async fn node_post(
    State(state): State<SharedState>,
    Path((name, node_path)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Response> {
    let route = parse_node_route(&node_path)?;
    run_locked(&state, move |state| match route {
        NodeRoute::Rename(names) => {
            if names.is_empty() {
                anyhow::bail!(EditorError::invalid("Cannot Rename root node"));
            }
            let mut manager = state.load(&name)?;
            require_node(&manager, &names)?;
            let body: RenameBody = parse_body(&body, "Invalid request")?;
            let new_names = split_new_name(&body.name)?;
            manager.rename_command_tree_node(&names, &new_names)?;
            manager.save()?;
            node_response(&manager, &new_names)
        }
        NodeRoute::LeafRename(names, leaf_name) => {
            let mut manager = state.load(&name)?;
            require_leaf(&manager, &names, &leaf_name)?;
            let body: RenameBody = parse_body(&body, "Invalid request")?;
            let new_names = split_new_name(&body.name)?;
            manager.rename_command_tree_leaf(&names, &leaf_name, &new_names)?;
            manager.save()?;
            Ok(StatusCode::OK.into_response())
        }
        NodeRoute::AddSwagger(names) => {
            let mut manager = state.load(&name)?;
            require_node(&manager, &names)?;
            let body: AddSwaggerBody = parse_body(&body, "Invalid request")?;
            manager.add_new_resources_by_swagger(&names, &body.module, &body.version, &body.resources)?;
            manager.save()?;
            Ok(StatusCode::OK.into_response())
        }
        _ => Ok(method_not_allowed()),
    })
    .await
}

// --- Resources ---

async fn merge_resources(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    run_locked(&state, move |state| {
        let mut manager = state.load(&name)?;
        let body: MergeBody = parse_body(&body, "Invalid request")?;
        let merged = manager.merge_resources(
            &body.main_resource.resource_id,
            &body.main_resource.version,
            &body.plus_resource.resource_id,
            &body.plus_resource.version,
        )?;
        if !merged {
            anyhow::bail!(EditorError::conflict("Cannot merge resources"));
        }
        manager.save()?;
        Ok(StatusCode::OK)
    })
    .await
}

async fn remove_resource(
    State(state): State<SharedState>,
    Path((name, resource_id, version)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let resource_id = b64decode_str(&resource_id)?;
    let version = b64decode_str(&version)?;
    run_locked(&state, move |state| {
        let mut manager = state.load(&name)?;
        if !manager.remove_resource(&resource_id, &version)? {
            return Ok(StatusCode::NO_CONTENT);
        }
        manager.save()?;
        Ok(StatusCode::OK)
    })
    .await
}

/// Routes of the editor API, without middleware.
pub fn router(state: SharedState) -> Router {
    let ws = format!("{}/Workspaces/{{name}}", API_PREFIX);
    Router::new()
        .route(
            &format!("{}/Workspaces", API_PREFIX),
            get(list_workspaces).post(create_workspace),
        )
        .route(&ws, get(get_workspace).delete(delete_workspace))
        .route(&format!("{}/Generate", ws), post(generate_workspace))
        .route(
            &format!("{}/CommandTree/Nodes/{{*node_path}}", ws),
            get(node_get)
                .patch(node_patch)
                .delete(node_delete)
                .post(node_post),
        )
        .route(&format!("{}/Resources/Merge", ws), post(merge_resources))
        .route(
            &format!("{}/Resources/{{resource_id}}/V/{{version}}", ws),
            delete(remove_resource),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::encoding::b64encode_str;
    use crate::editor::testing::{names, write_catalog_entry, PEERING_ID, PEERING_SUB_ID};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    struct TestApp {
        _root: TempDir,
        state: SharedState,
    }

    fn test_app() -> TestApp {
        let root = tempdir().unwrap();
        let aaz = root.path().join("aaz");
        write_catalog_entry(&aaz, PEERING_ID, "2018-04-01", "databricks workspace vnet-peering");
        write_catalog_entry(&aaz, PEERING_SUB_ID, "2018-04-01", "databricks vnet-peering");
        let state = Arc::new(AppState::new(root.path().join("workspaces"), aaz, None));
        TestApp { _root: root, state }
    }

    async fn call(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let response = router(app.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    const WS: &str = "/AAZ/Editor/Workspaces/demo";

    async fn app_with_peering() -> TestApp {
        let app = test_app();
        let (status, _) = call(
            &app,
            "POST",
            "/AAZ/Editor/Workspaces",
            Some(json!({"name": "demo", "plane": "mgmt-plane"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/AddSwagger", WS),
            Some(json!({"module": "databricks", "version": "2018-04-01", "resources": [PEERING_ID]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        app
    }

    #[test]
    fn test_parse_node_route() {
        assert_eq!(parse_node_route("aaz").unwrap(), NodeRoute::Node(vec![]));
        assert_eq!(
            parse_node_route("aaz/databricks/workspace").unwrap(),
            NodeRoute::Node(names("databricks workspace"))
        );
        assert_eq!(
            parse_node_route("aaz/databricks/Leaves/list/Rename").unwrap(),
            NodeRoute::LeafRename(names("databricks"), "list".to_string())
        );
        assert_eq!(
            parse_node_route("/aaz/a/AddSwagger").unwrap(),
            NodeRoute::AddSwagger(names("a"))
        );
        assert!(parse_node_route("az/databricks").is_err());
        assert!(parse_node_route("aaz/a/Rename/b").is_err());
        assert!(parse_node_route("aaz/a/Leaves").is_err());
    }

    #[tokio::test]
    async fn test_workspace_lifecycle() {
        let app = test_app();
        let (status, body) = call(
            &app,
            "POST",
            "/AAZ/Editor/Workspaces",
            Some(json!({"name": "demo", "plane": "mgmt-plane"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "demo");
        assert_eq!(body["url"], WS);
        assert!(body["updated"].as_f64().unwrap() > 0.0);
        assert_eq!(body["commandTree"]["names"][0], "aaz");

        let (status, _) = call(
            &app,
            "POST",
            "/AAZ/Editor/Workspaces",
            Some(json!({"name": "demo", "plane": "mgmt-plane"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(&app, "GET", "/AAZ/Editor/Workspaces", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "demo");
        assert_eq!(body[0]["url"], WS);

        let (status, body) = call(&app, "GET", WS, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plane"], "mgmt-plane");

        let (status, _) = call(&app, "DELETE", WS, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", WS, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = call(&app, "GET", WS, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("not exist"));
    }

    #[tokio::test]
    async fn test_create_workspace_bad_body() {
        let app = test_app();
        let (status, body) = call(&app, "POST", "/AAZ/Editor/Workspaces", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");

        let (status, _) = call(
            &app,
            "POST",
            "/AAZ/Editor/Workspaces",
            Some(json!({"name": "x", "plane": "space-plane"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, "POST", "/AAZ/Editor/Workspaces", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_node_get_patch_and_leaf() {
        let app = app_with_peering().await;
        let node_uri = format!("{}/CommandTree/Nodes/aaz/databricks", WS);

        let (status, body) = call(&app, "GET", &node_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["names"], json!(["databricks"]));

        let (status, _) = call(&app, "GET", &format!("{}/CommandTree/Nodes/az/databricks", WS), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "GET", &format!("{}/CommandTree/Nodes/aaz/missing", WS), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            "PATCH",
            &node_uri,
            Some(json!({"help": {"short": "Manage Databricks."}, "stage": "Experimental"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["help"]["short"], "Manage Databricks.");
        assert_eq!(body["stage"], "Experimental");

        let (status, _) = call(&app, "PATCH", &node_uri, Some(json!({"help": {"short": ""}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let leaf_uri = format!(
            "{}/CommandTree/Nodes/aaz/databricks/workspace/vnet-peering/Leaves/list",
            WS
        );
        let (status, body) = call(&app, "GET", &leaf_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("name").is_none());
        assert_eq!(body["names"], json!(["databricks", "workspace", "vnet-peering", "list"]));
        assert_eq!(body["stage"], "Experimental");
        assert_eq!(body["operations"][0]["http"]["request"]["method"], "get");

        let (status, _) = call(&app, "PATCH", &leaf_uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, body) = call(
            &app,
            "GET",
            &format!("{}/CommandTree/Nodes/aaz/databricks/Resources", WS),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], PEERING_ID);
        assert_eq!(body[0]["version"], "2018-04-01");
    }

    #[tokio::test]
    async fn test_rename_and_delete_nodes() {
        let app = app_with_peering().await;
        let (status, _) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/Rename", WS),
            Some(json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/databricks/workspace/Rename", WS),
            Some(json!({"name": "databricks ws"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["names"], json!(["databricks", "ws"]));

        let (status, _) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/databricks/ws/vnet-peering/Leaves/list/Rename", WS),
            Some(json!({"name": "databricks ws peering list"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(
            &app,
            "GET",
            &format!("{}/CommandTree/Nodes/aaz/databricks/ws/peering/Leaves/list", WS),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, "DELETE", &format!("{}/CommandTree/Nodes/aaz", WS), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let node_uri = format!("{}/CommandTree/Nodes/aaz/databricks", WS);
        let (status, _) = call(&app, "DELETE", &node_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", &node_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = call(&app, "GET", WS, None).await;
        assert_eq!(body["resources"], json!([]));
    }

    #[tokio::test]
    async fn test_rename_missing_targets() {
        let app = app_with_peering().await;
        let (status, body) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/missing/Rename", WS),
            Some(json!({"name": "x y"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Command group not exist");

        let (status, body) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/databricks/Leaves/missing/Rename", WS),
            Some(json!({"name": "databricks found"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Command not exist");
    }

    #[tokio::test]
    async fn test_add_swagger_rejects_path_like_version() {
        let app = app_with_peering().await;
        let (status, _) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/AddSwagger", WS),
            Some(json!({"module": "databricks", "version": "../../../../evil", "resources": [PEERING_SUB_ID]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let resource_uri = format!(
            "{}/Resources/{}/V/{}",
            WS,
            b64encode_str(PEERING_ID),
            b64encode_str("../evil")
        );
        let (status, _) = call(&app, "DELETE", &resource_uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = call(&app, "GET", WS, None).await;
        assert_eq!(body["resources"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_swagger_errors() {
        let app = app_with_peering().await;
        let uri = format!("{}/CommandTree/Nodes/aaz/AddSwagger", WS);
        let (status, _) = call(
            &app,
            "POST",
            &uri,
            Some(json!({"module": "databricks", "version": "2018-04-01", "resources": [PEERING_ID]})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, "POST", &uri, Some(json!({"module": "databricks"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            &uri,
            Some(json!({"module": "databricks", "version": "2018-04-01", "resources": ["/not/in/catalog"]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_merge_and_remove_resources() {
        let app = app_with_peering().await;
        let (status, _) = call(
            &app,
            "POST",
            &format!("{}/CommandTree/Nodes/aaz/AddSwagger", WS),
            Some(json!({"module": "databricks", "version": "2018-04-01", "resources": [PEERING_SUB_ID]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let merge_uri = format!("{}/Resources/Merge", WS);
        let (status, body) = call(
            &app,
            "POST",
            &merge_uri,
            Some(json!({
                "mainResource": {"resourceId": PEERING_ID, "version": "2018-04-01"},
                "plusResource": {"resourceId": PEERING_ID, "version": "2018-04-01"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Cannot merge resources");

        let (status, _) = call(
            &app,
            "POST",
            &merge_uri,
            Some(json!({
                "mainResource": {"resourceId": PEERING_ID, "version": "2018-04-01"},
                "plusResource": {"resourceId": PEERING_SUB_ID, "version": "2018-04-01"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let resource_uri = format!(
            "{}/Resources/{}/V/{}",
            WS,
            b64encode_str(PEERING_SUB_ID),
            b64encode_str("2018-04-01")
        );
        let (status, _) = call(&app, "DELETE", &resource_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", &resource_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = call(&app, "GET", WS, None).await;
        assert_eq!(body["resources"], json!([]));
    }

    #[tokio::test]
    async fn test_generate() {
        let app = app_with_peering().await;
        let (status, body) = call(&app, "POST", &format!("{}/Generate", WS), None).await;
        assert_eq!(status, StatusCode::OK);
        let files: Vec<&str> = body["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();
        assert!(files.contains(&"databricks/workspace/vnet-peering/_list.py"));
        let folder = PathBuf::from(body["folder"].as_str().unwrap());
        assert!(folder.join("databricks/workspace/vnet-peering/_list.py").is_file());
    }
}
