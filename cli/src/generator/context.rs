//! # Render Contexts
//!
//! File: cli/src/generator/context.rs
//!
//! Turns model documents into the flat, pre-formatted structures the
//! templates iterate over. All Python formatting decisions (quoting, keyword
//! arguments, attribute names) are made here so the templates only lay out
//! lines.
//!
//! Response schemas are emitted as a breadth-first sequence of blocks. Each
//! block binds a local variable to one schema node and declares that node's
//! children:
//!
//! ```text
//! _schema_on_200 = cls._schema_on_200            <- root block
//! _schema_on_200.value = AAZListType()
//!
//! value = cls._schema_on_200.value               <- array block
//! value.Element = AAZObjectType()
//! ```
//!
//! Object properties are declared in attribute name order. A node resolved
//! from a shared definition (`Schema::cls`) is declared but not expanded;
//! instead a call to a module-level `_build_schema_<name>_read` helper
//! follows it, and the helper builds the definition once and copies it.
//!
use super::naming::{
    py_bool, py_call, py_docstring, py_dq_str, py_str, to_class_name, to_snake_case,
};
use crate::model::{
    Arg, ArgType, Command, Help, HttpOperation, HttpParam, Plane, Property, Schema, SchemaKind,
    Stage, TreeNode,
};
use serde::Serialize;
use std::collections::VecDeque;

/// Indentation of field lines inside a schema builder.
const SCHEMA_FIELD_INDENT: usize = 12;
/// Indentation of field lines inside a module-level shared schema helper.
const SHARED_FIELD_INDENT: usize = 4;
/// Indentation of `_args_schema.<var> = ...` lines.
const ARG_INDENT: usize = 8;

#[derive(Serialize, Debug)]
pub struct CommandContext {
    pub full_name: String,
    pub class_name: String,
    pub stage_flag: Option<&'static str>,
    pub help_short: String,
    pub help_lines: Vec<String>,
    pub examples: Vec<ExampleContext>,
    pub arg_groups: Vec<ArgGroupContext>,
    pub operations: Vec<OperationContext>,
    pub output: Option<OutputContext>,
    pub shared_schemas: Vec<SharedSchemaContext>,
}

#[derive(Serialize, Debug)]
pub struct ExampleContext {
    pub name: String,
    pub commands: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct ArgGroupContext {
    pub name: String,
    pub args: Vec<ArgContext>,
}

#[derive(Serialize, Debug)]
pub struct ArgContext {
    pub var: String,
    pub call: String,
}

#[derive(Serialize, Debug)]
pub struct OutputContext {
    pub var: String,
    pub client_flatten: &'static str,
}

#[derive(Serialize, Debug)]
pub struct OperationContext {
    pub class_name: String,
    pub client_type: &'static str,
    pub error_format: &'static str,
    pub url: String,
    pub method: &'static str,
    pub url_params: Vec<ParamContext>,
    pub query_params: Vec<ParamContext>,
    pub handlers: Vec<HandlerContext>,
}

#[derive(Serialize, Debug)]
pub struct ParamContext {
    pub name: String,
    pub value: String,
    pub required: bool,
}

#[derive(Serialize, Debug)]
pub struct HandlerContext {
    /// Python list literal, e.g. `[200, 201]`.
    pub codes: String,
    pub method: String,
    pub var: String,
    pub builder: String,
    pub schema_attr: String,
    /// `None` when the response has no body.
    pub root_class: Option<&'static str>,
    pub blocks: Vec<SchemaBlock>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SchemaBlock {
    pub var: String,
    pub path: String,
    pub fields: Vec<SchemaField>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SchemaField {
    pub attr: String,
    pub call: String,
    /// Shared helper filling in the declared node, if any.
    pub builder: Option<String>,
}

/// A module-level `_build_schema_<name>_read` helper.
#[derive(Serialize, Debug, PartialEq)]
pub struct SharedSchemaContext {
    pub builder: String,
    pub global_var: String,
    pub root_class: &'static str,
    /// Top-level attributes copied from the cached definition.
    pub copies: Vec<String>,
    pub blocks: Vec<SchemaBlock>,
}

#[derive(Serialize, Debug)]
pub struct GroupContext {
    pub full_name: String,
    pub stage_flag: Option<&'static str>,
    pub help_short: String,
}

#[derive(Serialize, Debug)]
pub struct InitContext {
    pub modules: Vec<String>,
}

fn stage_flag(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Preview => Some("is_preview"),
        Stage::Experimental => Some("is_experimental"),
        Stage::Stable => None,
    }
}

fn client_type(plane: Plane) -> &'static str {
    match plane {
        Plane::Mgmt => "MgmtClient",
        Plane::Data => "DataPlaneClient",
    }
}

/// Module file name of a command, without extension: `list` -> `_list`.
pub fn command_module_name(command_name: &str) -> String {
    format!("_{}", to_snake_case(command_name))
}

pub fn type_class(schema: &Schema) -> &'static str {
    match schema.kind {
        SchemaKind::String => "AAZStrType",
        SchemaKind::Integer => "AAZIntType",
        SchemaKind::Float => "AAZFloatType",
        SchemaKind::Boolean => "AAZBoolType",
        SchemaKind::Object { .. } => "AAZObjectType",
        SchemaKind::Array { .. } => "AAZListType",
        SchemaKind::Dict { .. } => "AAZDictType",
    }
}

fn schema_kwargs(wire_name: Option<&str>, attr: &str, schema: &Schema) -> Vec<String> {
    let mut kwargs = Vec::new();
    if let Some(name) = wire_name {
        if name != attr {
            kwargs.push(format!("serialized_name={}", py_str(name)));
        }
    }
    let flags: Vec<String> = [
        ("required", schema.required),
        ("read_only", schema.read_only),
        ("client_flatten", schema.client_flatten),
    ]
    .iter()
    .filter(|(_, on)| *on)
    .map(|(flag, _)| format!("'{}': True", flag))
    .collect();
    if !flags.is_empty() {
        kwargs.push(format!("flags={{{}}}", flags.join(", ")));
    }
    kwargs
}

/// Breadth-first schema blocks below the root variable `root_attr`
/// (e.g. `_schema_on_200`). Shared definitions met on the way are added to
/// `shared`, once per name.
pub fn schema_blocks(
    root_attr: &str,
    root: &Schema,
    shared: &mut Vec<SharedSchemaContext>,
) -> Vec<SchemaBlock> {
    emit_blocks(
        root_attr.to_string(),
        format!("cls.{}", root_attr),
        root,
        SCHEMA_FIELD_INDENT,
        shared,
    )
}

fn emit_blocks(
    root_var: String,
    root_path: String,
    root: &Schema,
    indent: usize,
    shared: &mut Vec<SharedSchemaContext>,
) -> Vec<SchemaBlock> {
    let mut blocks = Vec::new();
    let mut queue: VecDeque<(String, String, &Schema)> = VecDeque::new();
    queue.push_back((root_var, root_path, root));

    while let Some((var, path, schema)) = queue.pop_front() {
        let mut fields = Vec::new();
        match &schema.kind {
            SchemaKind::Object { props } => {
                let mut props: Vec<&Property> = props.iter().collect();
                props.sort_by_cached_key(|p| to_snake_case(&p.name));
                for prop in props {
                    let attr = to_snake_case(&prop.name);
                    let (field, expand) =
                        schema_field(&attr, Some(prop.name.as_str()), &prop.schema, indent, shared);
                    fields.push(field);
                    if expand {
                        queue.push_back((attr.clone(), format!("{}.{}", path, attr), &prop.schema));
                    }
                }
            }
            SchemaKind::Array { item } | SchemaKind::Dict { item } => {
                let (field, expand) = schema_field("Element", None, item, indent, shared);
                fields.push(field);
                if expand {
                    queue.push_back(("_element".to_string(), format!("{}.Element", path), item.as_ref()));
                }
            }
            _ => {}
        }
        if !fields.is_empty() {
            blocks.push(SchemaBlock { var, path, fields });
        }
    }
    blocks
}

/// Declares `schema` as `attr`. The flag tells whether its children still
/// need blocks of their own.
fn schema_field(
    attr: &str,
    wire_name: Option<&str>,
    schema: &Schema,
    indent: usize,
    shared: &mut Vec<SharedSchemaContext>,
) -> (SchemaField, bool) {
    let kwargs = schema_kwargs(wire_name, attr, schema);
    let call = py_call(type_class(schema), &kwargs, indent);
    let builder = match &schema.cls {
        Some(name) if schema.has_children() => Some(shared_schema(name, schema, shared)),
        _ => None,
    };
    let expand = builder.is_none() && schema.has_children();
    let field = SchemaField {
        attr: attr.to_string(),
        call,
        builder,
    };
    (field, expand)
}

/// Registers the helper for the shared definition `name` and returns the
/// helper's function name.
fn shared_schema(name: &str, schema: &Schema, shared: &mut Vec<SharedSchemaContext>) -> String {
    let snake = to_snake_case(name);
    let builder = format!("_build_schema_{}_read", snake);
    if shared.iter().any(|s| s.builder == builder) {
        return builder;
    }
    let global_var = format!("_schema_{}_read", snake);
    let idx = shared.len();
    shared.push(SharedSchemaContext {
        builder: builder.clone(),
        global_var: global_var.clone(),
        root_class: type_class(schema),
        copies: Vec::new(),
        blocks: Vec::new(),
    });
    let blocks = emit_blocks(
        format!("{}_read", snake),
        global_var,
        schema,
        SHARED_FIELD_INDENT,
        shared,
    );
    let copies = blocks
        .first()
        .map(|b| b.fields.iter().map(|f| f.attr.clone()).collect())
        .unwrap_or_default();
    shared[idx].copies = copies;
    shared[idx].blocks = blocks;
    builder
}

fn arg_context(arg: &Arg) -> ArgContext {
    let mut kwargs = Vec::new();
    let class = match arg.arg_type {
        ArgType::ResourceGroup => "AAZResourceGroupNameArg",
        ArgType::String => "AAZStrArg",
        ArgType::Integer => "AAZIntArg",
        ArgType::Float => "AAZFloatArg",
        ArgType::Boolean => "AAZBoolArg",
    };
    if arg.arg_type != ArgType::ResourceGroup {
        let options: Vec<String> = if arg.options.is_empty() {
            vec![format!("--{}", arg.var.replace('_', "-"))]
        } else {
            arg.options.clone()
        };
        let quoted: Vec<String> = options.iter().map(|o| py_str(o)).collect();
        kwargs.push(format!("options=[{}]", quoted.join(", ")));
        if let Some(help) = &arg.help {
            kwargs.push(format!("help={}", py_str(help)));
        }
    }
    if arg.required {
        kwargs.push("required=True".to_string());
    }
    ArgContext {
        var: arg.var.clone(),
        call: py_call(class, &kwargs, ARG_INDENT),
    }
}

fn param_context(param: &HttpParam) -> ParamContext {
    let value = match (&param.const_value, &param.arg) {
        (Some(literal), _) => py_str(literal),
        (None, Some(arg)) => format!("self.ctx.args.{}", arg),
        (None, None) if param.name == "subscriptionId" => "self.ctx.subscription_id".to_string(),
        (None, None) => format!("self.ctx.args.{}", to_snake_case(&param.name)),
    };
    ParamContext {
        name: py_dq_str(&param.name),
        value,
        required: param.required,
    }
}

fn sorted_params(params: &[HttpParam]) -> Vec<ParamContext> {
    let mut params: Vec<&HttpParam> = params.iter().collect();
    params.sort_by(|a, b| a.name.cmp(&b.name));
    params.into_iter().map(param_context).collect()
}

fn operation_context(
    op: &HttpOperation,
    plane: Plane,
    output_var: &str,
    shared: &mut Vec<SharedSchemaContext>,
) -> OperationContext {
    let mut handlers = Vec::new();
    for response in op.success_responses().filter(|r| !r.status_codes.is_empty()) {
        let codes: Vec<String> = response.status_codes.iter().map(|c| c.to_string()).collect();
        let suffix = codes.join("_");
        let schema_attr = format!("_schema_on_{}", suffix);
        let blocks = match &response.body {
            Some(body) => schema_blocks(&schema_attr, body, shared),
            None => Vec::new(),
        };
        handlers.push(HandlerContext {
            codes: format!("[{}]", codes.join(", ")),
            method: format!("on_{}", suffix),
            var: output_var.to_string(),
            builder: format!("_build_schema_on_{}", suffix),
            root_class: response.body.as_ref().map(type_class),
            blocks,
            schema_attr,
        });
    }
    OperationContext {
        class_name: to_class_name(&op.operation_id),
        client_type: client_type(plane),
        error_format: "ODataV4Format",
        url: op.http.path.clone(),
        method: op.http.request.method.as_str(),
        url_params: sorted_params(&op.http.request.path_params),
        query_params: sorted_params(&op.http.request.query_params),
        handlers,
    }
}

/// Docstring summary and extra lines, escaped for a `"""` block.
fn help_parts(help: Option<&Help>, fallback: &str) -> (String, Vec<String>) {
    match help {
        Some(h) if !h.short.is_empty() => (
            py_docstring(&h.short),
            h.lines.iter().map(|l| py_docstring(l)).collect(),
        ),
        _ => (py_docstring(fallback), Vec::new()),
    }
}

/// Context for `_<command>.py`. `names` is the full command name path.
pub fn command_context(names: &[String], command: &Command, plane: Plane) -> CommandContext {
    let full_name = names.join(" ");
    let (help_short, help_lines) = help_parts(command.help.as_ref(), &full_name);
    let output_var = command
        .outputs
        .first()
        .map(|o| o.var.clone())
        .unwrap_or_else(|| "instance".to_string());
    let mut shared_schemas = Vec::new();
    let operations = command
        .operations
        .iter()
        .map(|op| operation_context(op, plane, &output_var, &mut shared_schemas))
        .collect();
    CommandContext {
        class_name: to_class_name(&command.name),
        stage_flag: stage_flag(command.stage),
        help_short,
        help_lines,
        examples: command
            .examples
            .iter()
            .map(|e| ExampleContext {
                name: py_docstring(&e.name),
                commands: e.commands.iter().map(|c| py_docstring(c)).collect(),
            })
            .collect(),
        arg_groups: command
            .arg_groups
            .iter()
            .map(|g| ArgGroupContext {
                name: g.name.clone(),
                args: g.args.iter().map(arg_context).collect(),
            })
            .collect(),
        operations,
        output: command.outputs.first().map(|o| OutputContext {
            var: o.var.clone(),
            client_flatten: py_bool(o.client_flatten),
        }),
        shared_schemas,
        full_name,
    }
}

/// Context for `__cmd_group.py`.
pub fn group_context(node: &TreeNode) -> GroupContext {
    let full_name = node.names.join(" ");
    let (help_short, _) = help_parts(node.help.as_ref(), &format!("Manage {}.", full_name));
    GroupContext {
        full_name,
        stage_flag: stage_flag(node.stage),
        help_short,
    }
}

/// Context for `__init__.py`: the command modules of a node, sorted.
pub fn init_context(node: &TreeNode) -> InitContext {
    let mut modules: Vec<String> = node.commands.keys().map(|c| command_module_name(c)).collect();
    modules.sort();
    InitContext { modules }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::testing::{names, peering_list_command, peering_list_schema};

    #[test]
    fn test_schema_blocks_are_breadth_first() {
        let mut shared = Vec::new();
        let blocks = schema_blocks("_schema_on_200", &peering_list_schema(), &mut shared);
        assert!(shared.is_empty());
        let order: Vec<(&str, &str)> = blocks
            .iter()
            .map(|b| (b.var.as_str(), b.path.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("_schema_on_200", "cls._schema_on_200"),
                ("value", "cls._schema_on_200.value"),
                ("_element", "cls._schema_on_200.value.Element"),
                ("properties", "cls._schema_on_200.value.Element.properties"),
                (
                    "remote_virtual_network",
                    "cls._schema_on_200.value.Element.properties.remote_virtual_network"
                ),
            ]
        );
        assert_eq!(blocks[0].fields[0].attr, "next_link");
        assert_eq!(
            blocks[0].fields[0].call,
            "AAZStrType(\n                serialized_name='nextLink',\n            )"
        );
        assert_eq!(blocks[0].fields[1].call, "AAZListType()");
        assert_eq!(blocks[1].fields[0].attr, "Element");
        let properties = &blocks[2].fields[2];
        assert_eq!(properties.attr, "properties");
        assert!(properties
            .call
            .contains("flags={'required': True, 'client_flatten': True}"));
    }

    #[test]
    fn test_schema_blocks_sort_properties_by_attribute() {
        let schema = Schema::object(vec![
            Schema::boolean().prop("useRemoteGateways"),
            Schema::object(vec![Schema::string().prop("id")])
                .required()
                .prop("remoteVirtualNetwork"),
            Schema::boolean().prop("allowForwardedTraffic"),
            Schema::object(vec![Schema::string().prop("id")]).prop("databricksVirtualNetwork"),
            Schema::string().read_only().prop("peeringState"),
        ]);
        let blocks = schema_blocks("_schema_on_200", &schema, &mut Vec::new());
        let attrs: Vec<&str> = blocks[0].fields.iter().map(|f| f.attr.as_str()).collect();
        assert_eq!(
            attrs,
            vec![
                "allow_forwarded_traffic",
                "databricks_virtual_network",
                "peering_state",
                "remote_virtual_network",
                "use_remote_gateways",
            ]
        );
        let children: Vec<&str> = blocks[1..].iter().map(|b| b.var.as_str()).collect();
        assert_eq!(children, vec!["databricks_virtual_network", "remote_virtual_network"]);
    }

    #[test]
    fn test_shared_definitions_become_helpers() {
        let address_space = || {
            Schema::object(vec![Schema::array(Schema::string()).prop("addressPrefixes")])
                .shared("AddressSpace")
        };
        let schema = Schema::object(vec![
            address_space().prop("remoteAddressSpace"),
            address_space().prop("databricksAddressSpace"),
        ]);
        let mut shared = Vec::new();
        let blocks = schema_blocks("_schema_on_200", &schema, &mut shared);

        assert_eq!(blocks.len(), 1);
        let fields = &blocks[0].fields;
        assert_eq!(fields[0].attr, "databricks_address_space");
        assert_eq!(
            fields[0].call,
            "AAZObjectType(\n                serialized_name='databricksAddressSpace',\n            )"
        );
        assert_eq!(fields[0].builder.as_deref(), Some("_build_schema_address_space_read"));
        assert_eq!(fields[1].builder.as_deref(), Some("_build_schema_address_space_read"));

        assert_eq!(shared.len(), 1);
        let helper = &shared[0];
        assert_eq!(helper.global_var, "_schema_address_space_read");
        assert_eq!(helper.root_class, "AAZObjectType");
        assert_eq!(helper.copies, vec!["address_prefixes".to_string()]);
        let order: Vec<(&str, &str)> = helper
            .blocks
            .iter()
            .map(|b| (b.var.as_str(), b.path.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("address_space_read", "_schema_address_space_read"),
                ("address_prefixes", "_schema_address_space_read.address_prefixes"),
            ]
        );
        assert_eq!(
            helper.blocks[0].fields[0].call,
            "AAZListType(\n        serialized_name='addressPrefixes',\n    )"
        );
    }

    #[test]
    fn test_help_is_escaped_for_docstrings() {
        let mut command = peering_list_command("2018-04-01");
        command.help = Some(Help {
            short: "Show \"\"\"quoted\"\"\" text.".to_string(),
            lines: vec!["Paths look like C:\\data.".to_string()],
        });
        command.examples[0].commands = vec!["databricks show --query \"\"\"x\"\"\"".to_string()];
        let ctx = command_context(&names("databricks show"), &command, Plane::Mgmt);
        assert_eq!(ctx.help_short, "Show \\\"\\\"\\\"quoted\\\"\\\"\\\" text.");
        assert_eq!(ctx.help_lines, vec!["Paths look like C:\\\\data.".to_string()]);
        assert_eq!(
            ctx.examples[0].commands[0],
            "databricks show --query \\\"\\\"\\\"x\\\"\\\"\\\""
        );
    }

    #[test]
    fn test_command_context() {
        let command = peering_list_command("2018-04-01");
        let ctx = command_context(
            &names("databricks workspace vnet-peering list"),
            &command,
            Plane::Mgmt,
        );
        assert_eq!(ctx.class_name, "List");
        assert_eq!(ctx.stage_flag, Some("is_preview"));

        let op = &ctx.operations[0];
        assert_eq!(op.class_name, "VNetPeeringListByWorkspace");
        assert_eq!(op.method, "GET");
        let url_names: Vec<&str> = op.url_params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            url_names,
            vec!["\"resourceGroupName\"", "\"subscriptionId\"", "\"workspaceName\""]
        );
        assert_eq!(op.url_params[0].value, "self.ctx.args.resource_group");
        assert_eq!(op.url_params[1].value, "self.ctx.subscription_id");
        assert_eq!(op.query_params[0].value, "'2018-04-01'");
        assert_eq!(op.handlers.len(), 1);
        assert_eq!(op.handlers[0].codes, "[200]");
        assert_eq!(op.handlers[0].var, "instance");

        let args = &ctx.arg_groups[0].args;
        assert_eq!(args[0].call, "AAZResourceGroupNameArg(\n            required=True,\n        )");
        assert!(args[1].call.contains("options=['--workspace-name']"));
        assert!(args[1].call.contains("help='The name of the workspace.'"));
    }

    #[test]
    fn test_module_names() {
        assert_eq!(command_module_name("list"), "_list");
        assert_eq!(command_module_name("show-status"), "_show_status");
    }
}
