//! Fixtures shared by unit tests: a small command catalog built around the
//! Databricks vnet-peering `list` command.
use crate::common::encoding::b64encode_str;
use crate::common::fs::io;
use crate::model::{
    Arg, ArgGroup, ArgType, Command, CommandConfiguration, CommandGroup, Example, Help, HttpAction,
    HttpMethod, HttpOperation, HttpParam, HttpRequest, HttpResponse, Output, Resource, Schema,
    Stage,
};
use std::path::Path;

pub const PEERING_ID: &str = "/subscriptions/{}/resourcegroups/{}/providers/microsoft.databricks/workspaces/{}/virtualnetworkpeerings";
pub const PEERING_SUB_ID: &str =
    "/subscriptions/{}/providers/microsoft.databricks/virtualnetworkpeerings";

pub fn names(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn param(name: &str, arg: Option<&str>) -> HttpParam {
    HttpParam {
        name: name.to_string(),
        arg: arg.map(str::to_string),
        const_value: None,
        required: true,
    }
}

pub fn peering_list_schema() -> Schema {
    let properties = Schema::object(vec![
        Schema::boolean().prop("allowForwardedTraffic"),
        Schema::string().read_only().prop("peeringState"),
        Schema::object(vec![Schema::string().prop("id")])
            .required()
            .prop("remoteVirtualNetwork"),
    ])
    .required()
    .client_flatten();
    let element = Schema::object(vec![
        Schema::string().read_only().prop("id"),
        Schema::string().read_only().prop("name"),
        properties.prop("properties"),
        Schema::string().read_only().prop("type"),
    ]);
    Schema::object(vec![
        Schema::string().prop("nextLink"),
        Schema::array(element).prop("value"),
    ])
}

/// The `list` command of the vnet-peering resource at `version`.
pub fn peering_list_command(version: &str) -> Command {
    let operation = HttpOperation {
        operation_id: "VNetPeering_ListByWorkspace".to_string(),
        http: HttpAction {
            path: "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Databricks/workspaces/{workspaceName}/virtualNetworkPeerings".to_string(),
            request: HttpRequest {
                method: HttpMethod::Get,
                path_params: vec![
                    param("workspaceName", Some("workspace_name")),
                    param("subscriptionId", None),
                    param("resourceGroupName", Some("resource_group")),
                ],
                query_params: vec![HttpParam {
                    name: "api-version".to_string(),
                    arg: None,
                    const_value: Some(version.to_string()),
                    required: true,
                }],
            },
            responses: vec![
                HttpResponse {
                    status_codes: vec![200],
                    body: Some(peering_list_schema()),
                    is_error: false,
                },
                HttpResponse {
                    status_codes: vec![],
                    body: None,
                    is_error: true,
                },
            ],
        },
    };
    Command {
        name: "list".to_string(),
        version: version.to_string(),
        help: Some(Help {
            short: "List vnet peerings under a workspace.".to_string(),
            lines: vec![],
        }),
        stage: Stage::Preview,
        resources: vec![],
        arg_groups: vec![ArgGroup {
            name: String::new(),
            args: vec![
                Arg {
                    var: "resource_group".to_string(),
                    arg_type: ArgType::ResourceGroup,
                    options: vec![],
                    help: None,
                    required: true,
                },
                Arg {
                    var: "workspace_name".to_string(),
                    arg_type: ArgType::String,
                    options: vec!["--workspace-name".to_string()],
                    help: Some("The name of the workspace.".to_string()),
                    required: true,
                },
            ],
        }],
        operations: vec![operation],
        outputs: vec![Output {
            var: "instance".to_string(),
            client_flatten: true,
        }],
        examples: vec![Example {
            name: "List vnet peerings under a workspace.".to_string(),
            commands: vec![
                "databricks workspace vnet-peering list --resource-group MyResourceGroup --workspace-name MyWorkspace".to_string(),
            ],
        }],
    }
}

/// Writes a catalog configuration for `id` whose `list` command lives in `group`.
pub fn write_catalog_entry(aaz_dir: &Path, id: &str, version: &str, group: &str) {
    let cfg = CommandConfiguration {
        resources: vec![Resource::new(id, version)],
        command_groups: vec![CommandGroup {
            name: group.to_string(),
            commands: vec![peering_list_command(version)],
        }],
    };
    let path = aaz_dir
        .join("Resources")
        .join("mgmt-plane")
        .join(b64encode_str(id))
        .join(format!("{}.json", version));
    io::write_json(&path, &cfg).unwrap();
}
