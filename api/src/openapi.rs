//! Machine-readable API description.
//!
//! Every route the router serves is described once in [`ROUTES`]; the path
//! constants are shared with the router so the two cannot drift apart. The
//! document is built at startup and served as JSON from [`API_DOCS`].

use serde_json::{Map, Value, json};

use crate::config::ApiConfig;

pub const TUTORIALS: &str = "/api/tutorials";
pub const TUTORIAL_BY_ID: &str = "/api/tutorials/{id}";
pub const PUBLISHED: &str = "/api/tutorials/published";
pub const API_DOCS: &str = "/v3/api-docs";

pub const API_TITLE: &str = "Tutorial Management API";
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamIn {
    Path,
    Query,
}

impl ParamIn {
    fn as_str(self) -> &'static str {
        match self {
            ParamIn::Path => "path",
            ParamIn::Query => "query",
        }
    }
}

/// A route parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamDoc {
    pub name: &'static str,
    pub location: ParamIn,
    pub description: &'static str,
    pub required: bool,
    /// JSON schema type (`integer`, `string`).
    pub schema_type: &'static str,
}

/// Shape of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    Empty,
    Tutorial,
    TutorialList,
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseDoc {
    pub status: u16,
    pub description: &'static str,
    pub body: Body,
}

/// One documented operation.
#[derive(Debug, Clone, Copy)]
pub struct RouteDoc {
    /// Lower-case HTTP method.
    pub method: &'static str,
    pub path: &'static str,
    pub operation_id: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub tag: &'static str,
    pub params: &'static [ParamDoc],
    /// Description of the JSON request body, for operations that take one.
    pub request_body: Option<&'static str>,
    pub responses: &'static [ResponseDoc],
}

const ID_PARAM: ParamDoc = ParamDoc {
    name: "id",
    location: ParamIn::Path,
    description: "Tutorial ID",
    required: true,
    schema_type: "integer",
};

const OK_TUTORIAL: ResponseDoc = ResponseDoc {
    status: 200,
    description: "The tutorial",
    body: Body::Tutorial,
};

const OK_LIST: ResponseDoc = ResponseDoc {
    status: 200,
    description: "Matching tutorials",
    body: Body::TutorialList,
};

const NO_CONTENT: ResponseDoc = ResponseDoc {
    status: 204,
    description: "No content",
    body: Body::Empty,
};

const NOT_FOUND: ResponseDoc = ResponseDoc {
    status: 404,
    description: "No tutorial with this ID",
    body: Body::Empty,
};

const BAD_REQUEST: ResponseDoc = ResponseDoc {
    status: 400,
    description: "Malformed request",
    body: Body::Empty,
};

const UNSUPPORTED_MEDIA_TYPE: ResponseDoc = ResponseDoc {
    status: 415,
    description: "Request body is not JSON",
    body: Body::Empty,
};

const SERVER_ERROR: ResponseDoc = ResponseDoc {
    status: 500,
    description: "Unexpected failure or missing request body",
    body: Body::Empty,
};

/// All operations served under `/api`.
pub const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "get",
        path: TUTORIALS,
        operation_id: "getAllTutorials",
        summary: "Get all tutorials or by containing request parameter in the title",
        description: "Get tutorials in JSON format",
        tag: "Get all tutorials",
        params: &[ParamDoc {
            name: "title2",
            location: ParamIn::Query,
            description: "Title part to search in titles",
            required: false,
            schema_type: "string",
        }],
        request_body: None,
        responses: &[OK_LIST, NO_CONTENT, SERVER_ERROR],
    },
    RouteDoc {
        method: "post",
        path: TUTORIALS,
        operation_id: "createTutorial",
        summary: "Add tutorial data",
        description: "Add tutorial. New tutorials are always unpublished. Response in JSON format",
        tag: "Add tutorial",
        params: &[],
        request_body: Some("Tutorial data adding"),
        responses: &[OK_TUTORIAL, BAD_REQUEST, UNSUPPORTED_MEDIA_TYPE, SERVER_ERROR],
    },
    RouteDoc {
        method: "delete",
        path: TUTORIALS,
        operation_id: "deleteAllTutorials",
        summary: "Delete all tutorials",
        description: "Remove every tutorial. IDs are not reused afterwards",
        tag: "Delete tutorial",
        params: &[],
        request_body: None,
        responses: &[NO_CONTENT, SERVER_ERROR],
    },
    RouteDoc {
        method: "get",
        path: TUTORIAL_BY_ID,
        operation_id: "getTutorialById",
        summary: "Get tutorial by ID",
        description: "Get tutorial using ID as part of URI. Response in JSON format",
        tag: "Get By ID",
        params: &[ID_PARAM],
        request_body: None,
        responses: &[OK_TUTORIAL, BAD_REQUEST, NOT_FOUND],
    },
    RouteDoc {
        method: "put",
        path: TUTORIAL_BY_ID,
        operation_id: "updateTutorial",
        summary: "Change tutorial data using ID",
        description: "Change tutorial using ID. Response in JSON format",
        tag: "Change tutorial",
        params: &[ID_PARAM],
        request_body: Some("Data to insert into tutorial"),
        responses: &[
            OK_TUTORIAL,
            BAD_REQUEST,
            NOT_FOUND,
            UNSUPPORTED_MEDIA_TYPE,
            SERVER_ERROR,
        ],
    },
    RouteDoc {
        method: "delete",
        path: TUTORIAL_BY_ID,
        operation_id: "deleteTutorial",
        summary: "Delete tutorial using ID",
        description: "Delete tutorial using ID",
        tag: "Delete tutorial",
        params: &[ID_PARAM],
        request_body: None,
        responses: &[NO_CONTENT, SERVER_ERROR],
    },
    RouteDoc {
        method: "get",
        path: PUBLISHED,
        operation_id: "findByPublished",
        summary: "Filter tutorials by published field",
        description: "Filter tutorial. Response is the list of published tutorials in JSON format",
        tag: "Filter tutorials by published",
        params: &[],
        request_body: None,
        responses: &[OK_LIST, NO_CONTENT],
    },
];

/// Builds the OpenAPI document for `config`.
pub fn document(config: &ApiConfig) -> Value {
    let mut servers = vec![json!({
        "url": config.dev_url,
        "description": "Server URL in Development environment",
    })];
    if let Some(prod_url) = &config.prod_url {
        servers.push(json!({
            "url": prod_url,
            "description": "Server URL in Production environment",
        }));
    }

    let mut paths = Map::new();
    for route in ROUTES {
        if let Value::Object(ops) = paths
            .entry(route.path)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            ops.insert(route.method.to_string(), operation(route));
        }
    }

    json!({
        "openapi": "3.0.1",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": "API describes endpoints to manage tutorials",
            "termsOfService": "url-to-terms-conditions.url",
            "contact": {
                "name": "Server's admin name",
                "email": "someemail@mail.mail",
                "url": "someurl.url",
            },
            "license": {
                "name": "GNU License",
                "url": "https://www.gnu.org/licenses/gpl-3.0.html",
            },
        },
        "servers": servers,
        "tags": [{
            "name": "API Tutorial",
            "description": "Description of API tutorial",
        }],
        "paths": paths,
        "components": {
            "schemas": {
                "Tutorial": tutorial_schema(),
            },
        },
    })
}

fn operation(route: &RouteDoc) -> Value {
    let mut op = json!({
        "operationId": route.operation_id,
        "summary": route.summary,
        "description": route.description,
        "tags": ["API Tutorial", route.tag],
        "responses": responses(route.responses),
    });

    if !route.params.is_empty() {
        let params: Vec<Value> = route
            .params
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "in": p.location.as_str(),
                    "description": p.description,
                    "required": p.required,
                    "schema": schema_for_param(p.schema_type),
                })
            })
            .collect();
        op["parameters"] = Value::Array(params);
    }

    if let Some(description) = route.request_body {
        op["requestBody"] = json!({
            "description": description,
            "required": true,
            "content": {
                "application/json": { "schema": tutorial_ref() },
            },
        });
    }

    op
}

fn responses(docs: &[ResponseDoc]) -> Value {
    let mut out = Map::new();
    for doc in docs {
        let mut response = json!({ "description": doc.description });
        let schema = match doc.body {
            Body::Empty => None,
            Body::Tutorial => Some(tutorial_ref()),
            Body::TutorialList => Some(json!({ "type": "array", "items": tutorial_ref() })),
        };
        if let Some(schema) = schema {
            response["content"] = json!({ "application/json": { "schema": schema } });
        }
        out.insert(doc.status.to_string(), response);
    }
    Value::Object(out)
}

fn schema_for_param(schema_type: &str) -> Value {
    if schema_type == "integer" {
        json!({ "type": "integer", "format": "int64" })
    } else {
        json!({ "type": schema_type })
    }
}

fn tutorial_ref() -> Value {
    json!({ "$ref": "#/components/schemas/Tutorial" })
}

fn tutorial_schema() -> Value {
    json!({
        "type": "object",
        "description": "Data model of Tutorial",
        "properties": {
            "id": {
                "type": "integer",
                "format": "int64",
                "description": "Unique number",
                "example": 20,
            },
            "title": {
                "type": "string",
                "description": "Title of tutorial",
                "example": "Example of title",
            },
            "description": {
                "type": "string",
                "description": "Description of tutorial",
                "example": "Example of description",
            },
            "published": {
                "type": "boolean",
                "description": "Boolean value of publishing",
                "example": false,
            },
        },
    })
}
