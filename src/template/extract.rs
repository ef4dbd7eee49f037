//! Value extraction: concrete value data for discovered declarations.
//!
//! The builder is agnostic to where values come from. A [`ValueExtractor`]
//! receives the declaration list and returns a name → JSON map. Two
//! implementations are provided:
//!
//! - [`FixedValues`] - a precomputed map, e.g. loaded from JSON or YAML
//! - [`StaticEvaluator`] - evaluates the scanned initializers directly
//!
//! Extraction is a synchronous call with no deadline of its own; callers
//! that need one wrap the call.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Number, Value};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, trace};

use crate::base::Location;
use crate::hir::{DeclarationKind, Discovery};
use crate::parser::{CompositeLit, ElementKey, Expr, Literal, UnaryOp};
use crate::project::{ReservedNames, ShapeRegistry};

/// Name → value data for declarations.
pub type ValueMap = BTreeMap<String, Value>;

// ============================================================================
// ERRORS
// ============================================================================

/// Why a single initializer could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{what} cannot be evaluated statically")]
    Unsupported { what: &'static str },

    #[error("unknown identifier {0}")]
    UnknownIdentifier(SmolStr),

    #[error("{0} has no initializer")]
    Uninitialized(SmolStr),

    #[error("invalid number literal {0}")]
    InvalidNumber(SmolStr),

    #[error("map keys must evaluate to strings")]
    NonStringKey,

    #[error("value cycle: {}", .0.join(" -> "))]
    Cycle(Vec<SmolStr>),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{location}: cannot extract value of {name}: {source}")]
    Eval {
        name: SmolStr,
        location: Location,
        #[source]
        source: EvalError,
    },

    #[error("failed to load values from {path}: {message}")]
    Load { path: String, message: String },

    #[error("value extraction failed: {0}")]
    Failed(String),
}

// ============================================================================
// REQUEST & TRAIT
// ============================================================================

/// One declaration whose value is requested.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestedDeclaration {
    pub name: SmolStr,
    pub kind: DeclarationKind,
    pub location: Location,
}

/// The set of declarations a build needs values for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionRequest {
    pub declarations: Vec<RequestedDeclaration>,
}

impl ExtractionRequest {
    pub fn from_discovery(discovery: &Discovery) -> Self {
        Self {
            declarations: discovery
                .declarations()
                .map(|decl| RequestedDeclaration {
                    name: decl.name.clone(),
                    kind: decl.kind,
                    location: decl.location.clone(),
                })
                .collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }
}

/// Supplies concrete value data for discovered declarations.
pub trait ValueExtractor {
    /// Values for (a subset of) the requested declarations. Declarations
    /// without an entry are treated as having no value.
    fn extract(&self, request: &ExtractionRequest) -> Result<ValueMap, ExtractionError>;
}

// ============================================================================
// FIXED VALUES
// ============================================================================

/// A precomputed value map, filtered to the requested names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedValues {
    values: ValueMap,
}

impl FixedValues {
    pub fn new(values: ValueMap) -> Self {
        Self { values }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Load a JSON or YAML object of name → value.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let load_error = |message: String| ExtractionError::Load {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let values: ValueMap = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| load_error(e.to_string()))?
            }
            _ => serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?,
        };
        Ok(Self { values })
    }
}

impl ValueExtractor for FixedValues {
    fn extract(&self, request: &ExtractionRequest) -> Result<ValueMap, ExtractionError> {
        Ok(request
            .names()
            .filter_map(|name| {
                self.values
                    .get(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect())
    }
}

// ============================================================================
// STATIC EVALUATOR
// ============================================================================

/// Evaluates retained initializers without running any code.
///
/// | Expression                       | Value                                |
/// |----------------------------------|--------------------------------------|
/// | string / number / `true` / `nil` | JSON scalar                          |
/// | `T{K: v}` / `map[..]..{"k": v}`  | object (keys are field names)        |
/// | `[]T{a, b}`, positional `T{a}`   | array                                |
/// | `&x`, `(x)`, `-n`                | value of `x`, negated number         |
/// | resource or parameter `X`        | `{"Ref": "X"}`                       |
/// | resource attribute `X.Attr`      | `{"Fn::GetAtt": ["X", "Attr"]}`      |
/// | pseudo-parameter constant        | `{"Ref": "AWS::Region"}` etc.        |
/// | condition `C`                    | `"C"`; `{"Condition": "C"}` in And/Or/Not |
/// | intrinsic shape `Sub{...}`       | `{"Fn::Sub": ...}`                   |
/// | other binding `h`                | value of `h`, inlined                |
pub struct StaticEvaluator<'a> {
    discovery: &'a Discovery,
    shapes: &'a ShapeRegistry,
    reserved: &'a ReservedNames,
}

/// Evaluation state for one top-level declaration.
struct EvalContext {
    /// Helper bindings currently being inlined
    inlining: Vec<SmolStr>,
    /// Inside an And/Or/Not argument list
    in_condition: bool,
}

const CONDITION_COMBINATORS: &[&str] = &["Fn::And", "Fn::Or", "Fn::Not"];

impl<'a> StaticEvaluator<'a> {
    pub fn new(
        discovery: &'a Discovery,
        shapes: &'a ShapeRegistry,
        reserved: &'a ReservedNames,
    ) -> Self {
        Self {
            discovery,
            shapes,
            reserved,
        }
    }

    /// Value of one binding's initializer; `None` when it has none.
    pub fn evaluate(&self, name: &str) -> Result<Option<Value>, EvalError> {
        let Some(site) = self.discovery.binding(name) else {
            return Err(EvalError::UnknownIdentifier(SmolStr::new(name)));
        };
        let Some(expr) = &site.value else {
            return Ok(None);
        };
        let mut ctx = EvalContext {
            inlining: vec![site.name.clone()],
            in_condition: false,
        };
        self.eval(expr, &mut ctx).map(Some)
    }

    fn eval(&self, expr: &Expr, ctx: &mut EvalContext) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(lit) => eval_literal(lit),
            Expr::Ident(ident) => self.eval_ident(&ident.text, ctx),
            Expr::Selector { base, field } => match base.as_ref() {
                Expr::Ident(base) if self.discovery.is_resource(&base.text) => Ok(serde_json::json!({
                    "Fn::GetAtt": [base.text.as_str(), field.text.as_str()]
                })),
                Expr::Ident(_) => match self.reserved.pseudo_parameter(&field.text) {
                    Some(pseudo) => Ok(reference(pseudo)),
                    None => Err(EvalError::Unsupported {
                        what: "package member reference",
                    }),
                },
                _ => Err(EvalError::Unsupported {
                    what: "selector expression",
                }),
            },
            Expr::Composite(lit) => self.eval_composite(lit, ctx),
            Expr::Paren(inner) => self.eval(inner, ctx),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Addr | UnaryOp::Plus => self.eval(operand, ctx),
                UnaryOp::Neg => negate(self.eval(operand, ctx)?),
                _ => Err(EvalError::Unsupported {
                    what: "unary operator",
                }),
            },
            Expr::Binary { .. } => Err(EvalError::Unsupported {
                what: "binary expression",
            }),
            Expr::Call { .. } => Err(EvalError::Unsupported {
                what: "function call",
            }),
            Expr::Index { .. } | Expr::Slice { .. } => Err(EvalError::Unsupported {
                what: "index expression",
            }),
            Expr::Type(_) | Expr::FuncLit => Err(EvalError::Unsupported {
                what: "type or function literal",
            }),
        }
    }

    fn eval_ident(&self, name: &SmolStr, ctx: &mut EvalContext) -> Result<Value, EvalError> {
        match name.as_str() {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "nil" => return Ok(Value::Null),
            _ => {}
        }

        if let Some(decl) = self.discovery.declaration(name) {
            return Ok(match decl.kind {
                DeclarationKind::Resource | DeclarationKind::Parameter => reference(name),
                DeclarationKind::Condition if ctx.in_condition => {
                    serde_json::json!({ "Condition": name.as_str() })
                }
                DeclarationKind::Condition
                | DeclarationKind::Mapping
                | DeclarationKind::Output => Value::String(name.to_string()),
            });
        }

        if let Some(pseudo) = self.reserved.pseudo_parameter(name) {
            return Ok(reference(pseudo));
        }

        let Some(site) = self.discovery.binding(name) else {
            return Err(EvalError::UnknownIdentifier(name.clone()));
        };
        if ctx.inlining.contains(name) {
            let mut chain = ctx.inlining.clone();
            chain.push(name.clone());
            return Err(EvalError::Cycle(chain));
        }
        let Some(value) = &site.value else {
            return Err(EvalError::Uninitialized(name.clone()));
        };

        trace!("inlining {}", name);
        ctx.inlining.push(name.clone());
        let result = self.eval(value, ctx);
        ctx.inlining.pop();
        result
    }

    fn eval_composite(&self, lit: &CompositeLit, ctx: &mut EvalContext) -> Result<Value, EvalError> {
        if let Some(key) = self.intrinsic_key(lit) {
            let outer = ctx.in_condition;
            ctx.in_condition = CONDITION_COMBINATORS.contains(&key);
            let args: Result<Vec<Value>, EvalError> = lit
                .elements
                .iter()
                .map(|element| self.eval(&element.value, ctx))
                .collect();
            ctx.in_condition = outer;

            let mut args = args?;
            let value = if args.len() == 1 && !CONDITION_COMBINATORS.contains(&key) {
                args.remove(0)
            } else {
                Value::Array(args)
            };
            let mut map = Map::new();
            map.insert(key.to_string(), value);
            return Ok(Value::Object(map));
        }

        let is_sequence = lit.ty.as_ref().is_some_and(|ty| ty.is_sequence());
        if is_sequence || (!lit.is_keyed() && !lit.elements.is_empty()) {
            return lit
                .elements
                .iter()
                .map(|element| self.eval(&element.value, ctx))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }

        let mut map = Map::new();
        for element in &lit.elements {
            let key = match &element.key {
                Some(ElementKey::Field(name)) => name.to_string(),
                Some(ElementKey::Expr(key)) => match self.eval(key, ctx)? {
                    Value::String(key) => key,
                    _ => return Err(EvalError::NonStringKey),
                },
                None => return Err(EvalError::NonStringKey),
            };
            map.insert(key, self.eval(&element.value, ctx)?);
        }
        Ok(Value::Object(map))
    }

    /// Intrinsic key for literals of an intrinsic-function shape.
    fn intrinsic_key(&self, lit: &CompositeLit) -> Option<&'a str> {
        let (namespace, name) = lit.shape()?;
        if namespace.is_some_and(|ns| self.shapes.is_resource_namespace(ns)) {
            return None;
        }
        self.reserved.intrinsic_for_shape(name)
    }
}

impl ValueExtractor for StaticEvaluator<'_> {
    fn extract(&self, request: &ExtractionRequest) -> Result<ValueMap, ExtractionError> {
        let mut values = ValueMap::new();
        for decl in &request.declarations {
            let value = self
                .evaluate(&decl.name)
                .map_err(|source| ExtractionError::Eval {
                    name: decl.name.clone(),
                    location: decl.location.clone(),
                    source,
                })?;
            if let Some(value) = value {
                values.insert(decl.name.to_string(), value);
            }
        }
        debug!("statically evaluated {} declarations", values.len());
        Ok(values)
    }
}

fn reference(name: &str) -> Value {
    serde_json::json!({ "Ref": name })
}

fn eval_literal(lit: &Literal) -> Result<Value, EvalError> {
    match lit {
        Literal::String(s) => Ok(Value::String(s.clone())),
        Literal::Int(text) => parse_int(text)
            .map(Value::from)
            .ok_or_else(|| EvalError::InvalidNumber(text.clone())),
        Literal::Float(text) => text
            .replace('_', "")
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| EvalError::InvalidNumber(text.clone())),
        Literal::Rune(_) => Err(EvalError::Unsupported {
            what: "rune literal",
        }),
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        i64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

fn negate(value: Value) -> Result<Value, EvalError> {
    let Value::Number(n) = &value else {
        return Err(EvalError::Unsupported {
            what: "negation of a non-number",
        });
    };
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(-i));
    }
    n.as_f64()
        .and_then(|f| Number::from_f64(-f))
        .map(Value::Number)
        .ok_or(EvalError::Unsupported {
            what: "negation of a non-number",
        })
}
