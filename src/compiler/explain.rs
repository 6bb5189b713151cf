//! Explain output for compiled filters
//!
//! Produces deterministic output, both as JSON and as text.

use std::fmt;

use serde::Serialize;

use super::compiler::{BoundValue, CompiledPredicate, ParameterPlan};
use super::errors::CompileError;

/// Explain output for one compilation
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Whether compilation succeeded
    pub accepted: bool,
    pub model_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterPlan>,
    pub match_all: bool,
    /// Fields left out of the relational predicate
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a successful compilation
    pub fn from_compiled(model_type: &str, compiled: &CompiledPredicate, order_by: &str) -> Self {
        Self {
            accepted: true,
            model_type: model_type.to_string(),
            where_clause: Some(compiled.where_clause()),
            order_by: Some(order_by.to_string()),
            parameters: Some(compiled.parameters.clone()),
            match_all: compiled.match_all,
            dropped: compiled.dropped.iter().map(|f| f.to_string()).collect(),
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Creates an explain plan from a compile error
    pub fn from_error(model_type: &str, err: &CompileError) -> Self {
        Self {
            accepted: false,
            model_type: model_type.to_string(),
            where_clause: None,
            order_by: None,
            parameters: None,
            match_all: false,
            dropped: Vec::new(),
            rejection_code: Some(err.code().code().to_string()),
            rejection_reason: Some(err.message().to_string()),
        }
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN {} ===", self.model_type)?;

        if !self.accepted {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Status: ACCEPTED")?;
        if let Some(clause) = &self.where_clause {
            writeln!(f, "Where: {}", clause)?;
        }
        if let Some(order_by) = &self.order_by {
            writeln!(f, "Order By: {}", order_by)?;
        }
        if let Some(parameters) = &self.parameters {
            if !parameters.is_empty() {
                writeln!(f, "Parameters:")?;
                for binding in parameters.iter() {
                    match &binding.value {
                        BoundValue::Single(v) => writeln!(f, "  :{} = {:?}", binding.name, v)?,
                        BoundValue::List(vs) => writeln!(f, "  :{} IN {:?}", binding.name, vs)?,
                    }
                }
            }
        }
        if !self.dropped.is_empty() {
            writeln!(f, "Dropped: {}", self.dropped.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompilerOptions, FullTextCapability, PredicateCompiler, SortSpec};
    use crate::filter::{Filter, QueryClause, Value};
    use crate::registry::{DataType, FieldMetadata, FieldRegistry, TypeDefinition};

    fn registry() -> FieldRegistry {
        FieldRegistry::builder()
            .model_type(
                TypeDefinition::new("Customer", 1)
                    .with_field(FieldMetadata::scalar("oid", DataType::Identifier))
                    .with_field(FieldMetadata::scalar("status", DataType::String)),
            )
            .build()
            .unwrap()
    }

    fn explain(filter: &Filter) -> ExplainPlan {
        let registry = registry();
        let model = registry.type_named("Customer").unwrap();
        let options = CompilerOptions::default();
        let compiler = PredicateCompiler::new(model, &options, FullTextCapability::Unsupported);
        match compiler.compile(filter) {
            Ok(compiled) => {
                let order_by = compiler.compile_ordering(&[SortSpec::asc("status")]).unwrap();
                ExplainPlan::from_compiled(model.name(), &compiled, &order_by)
            }
            Err(err) => ExplainPlan::from_error(model.name(), &err),
        }
    }

    #[test]
    fn test_explain_accepted() {
        let plan = explain(&Filter::all().must(QueryClause::equals("status", Value::text("ACTIVE"))));

        assert!(plan.accepted);
        assert_eq!(
            plan.where_clause.as_deref(),
            Some("WHERE ((entity.status = :status))")
        );
        assert_eq!(plan.order_by.as_deref(), Some("entity.status ASC, entity.oid ASC"));

        let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(json["parameters"][0]["name"], "status");
        assert_eq!(json["parameters"][0]["value"]["value"], "ACTIVE");
        assert!(json.get("rejection_code").is_none());

        let text = plan.to_string();
        assert!(text.contains("ACCEPTED"));
        assert!(text.contains(":status"));
    }

    #[test]
    fn test_explain_rejected() {
        let plan = explain(&Filter::all().must(QueryClause::equals("nickname", Value::text("x"))));

        assert!(!plan.accepted);
        assert_eq!(plan.rejection_code.as_deref(), Some("CQ_COMPILE_UNKNOWN_FIELD"));
        assert!(plan.to_string().contains("REJECTED"));
    }

    #[test]
    fn test_explain_deterministic() {
        let filter = Filter::all().must(QueryClause::equals("status", Value::text("ACTIVE")));
        assert_eq!(
            explain(&filter).to_json().unwrap(),
            explain(&filter).to_json().unwrap()
        );
    }
}
