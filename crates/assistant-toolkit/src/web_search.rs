//! Web Search Tool
//!
//! Serves canned results for a handful of topics and a generic fallback for
//! everything else. Stands in for a real search backend; the contract is
//! what matters to the rest of the system.

use async_trait::async_trait;
use serde_json::json;

use assistant_core::{
    ParameterSchema, Result, Tool, ToolCall, ToolOutcome, ToolSchema,
};

const TOPIC_RESULTS: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            "Python.org - Official Python Programming Language Website",
            "Python Tutorial - Learn Python Programming",
            "Python Documentation - Comprehensive Guide",
            "Python for Beginners - Start Learning Python",
        ],
    ),
    (
        "javascript",
        &[
            "MDN Web Docs - JavaScript Documentation",
            "JavaScript Tutorial - Learn JavaScript Programming",
            "W3Schools JavaScript - Interactive Tutorials",
            "JavaScript.info - Modern JavaScript Tutorial",
        ],
    ),
    (
        "machine learning",
        &[
            "Machine Learning Mastery - Practical ML Tutorials",
            "Coursera Machine Learning Course by Andrew Ng",
            "TensorFlow - Open Source ML Platform",
            "Scikit-learn - Machine Learning in Python",
        ],
    ),
    (
        "web development",
        &[
            "MDN Web Docs - Web Development Resources",
            "W3Schools - Web Development Tutorials",
            "FreeCodeCamp - Learn Web Development",
            "The Odin Project - Full Stack Web Development",
        ],
    ),
    (
        "data science",
        &[
            "DataCamp - Learn Data Science Online",
            "Kaggle - Data Science Competitions",
            "Towards Data Science - Medium Publication",
            "Data Science Central - Community and Resources",
        ],
    ),
];

/// Web search tool
pub struct WebSearchTool;

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "web_search".into(),
            description: "Search the web for information".into(),
            parameters: vec![ParameterSchema::required_string("query", "Search query")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolOutcome> {
        let query = call.str_arg("query").unwrap_or_default();
        if query.trim().is_empty() {
            return Ok(ToolOutcome::failure("web_search", "No query provided"));
        }

        let results = find_results(query);
        let top: Vec<&String> = results.iter().take(3).collect();

        let mut output = format!(
            "Found {} relevant results for '{}':\n",
            results.len(),
            query
        );
        for result in &top {
            output.push_str(&format!("  • {}\n", result));
        }

        Ok(ToolOutcome::success("web_search", output.trim_end()).with_data(json!({
            "query": query,
            "results_count": results.len(),
            "top_results": top,
            "detailed_results": results,
        })))
    }
}

/// Top-two results for each topic the query mentions, generic links otherwise
fn find_results(query: &str) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut relevant = Vec::new();

    for (topic, results) in TOPIC_RESULTS {
        if query_lower.contains(topic) {
            relevant.extend(results.iter().take(2).map(|r| (*r).to_string()));
        }
    }

    if relevant.is_empty() {
        relevant = vec![
            format!("Top result for '{}' - Comprehensive guide and tutorials", query),
            format!("Best resource for '{}' - Expert insights and examples", query),
            format!("Learn '{}' - Step-by-step tutorials and documentation", query),
        ];
    }

    relevant
}
