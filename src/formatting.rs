// src/formatting.rs

use crate::core::{BusinessAlert, HttpPanicAlert, RpcPanicAlert, Severity};
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// Timestamp layout stamped into message headers.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stack traces longer than this many characters are cut before rendering.
const STACK_LIMIT_CHARS: usize = 500;

const STACK_TRUNCATION_MARKER: &str = "\n... (stack trace truncated)";

/// Ambient values a record needs to render itself. Supplied by the
/// collector so rendering stays a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Wall-clock time shown in the message header.
    pub rendered_at: DateTime<Utc>,
    /// Whether the emitting process runs in production.
    pub production: bool,
}

/// A trait for rendering an alert record into chat message text.
pub trait RenderMessage {
    fn render(&self, ctx: &RenderContext) -> String;
}

impl RenderMessage for BusinessAlert {
    fn render(&self, ctx: &RenderContext) -> String {
        let mut text = format!(
            "**{} Business Alert**\n\n\
             **Time**: {}\n\
             **Category**: {}\n\
             **Title**: {}\n\
             **Service**: {}\n\
             **Severity**: {}\n",
            severity_glyph(self.severity),
            ctx.rendered_at.format(TIMESTAMP_FORMAT),
            self.category,
            self.title,
            self.service,
            self.severity,
        );

        if let Some(method) = &self.method {
            text.push_str(&format!("**Method**: {}\n", method));
        }

        if !self.metrics.is_empty() {
            let metrics: Vec<String> = self
                .metrics
                .iter()
                .map(|(key, value)| format!("**{}**: {}", key, value))
                .collect();
            text.push_str(&format!("**Metrics**: {}\n", metrics.join(", ")));
        }

        if !self.description.is_empty() {
            text.push_str(&format!("\n**Details**:\n{}", self.description));
        }

        text
    }
}

impl RenderMessage for RpcPanicAlert {
    fn render(&self, ctx: &RenderContext) -> String {
        format!(
            "**🚨 RPC Panic Alert**\n\n\
             **Time**: {}\n\
             **Production**: {}\n\
             **Method**: {}\n\
             **Error**: {}\n\n\
             **Stack Trace**:\n```\n{}\n```",
            ctx.rendered_at.format(TIMESTAMP_FORMAT),
            ctx.production,
            self.method,
            self.panic_value,
            truncate_stack(&self.stack),
        )
    }
}

impl RenderMessage for HttpPanicAlert {
    fn render(&self, ctx: &RenderContext) -> String {
        format!(
            "**🚨 HTTP Panic Alert**\n\n\
             **Time**: {}\n\
             **Request**: {} {}\n\
             **Client**: {}\n\
             **Error**: {}\n\n\
             **Stack Trace**:\n```\n{}\n```",
            ctx.rendered_at.format(TIMESTAMP_FORMAT),
            self.method,
            self.url,
            self.remote_addr,
            self.panic_value,
            truncate_stack(&self.stack),
        )
    }
}

/// Maps a severity to the glyph shown in the message header.
pub fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🚨",
        Severity::High => "⚠️",
        Severity::Medium => "⚡",
        Severity::Low => "ℹ️",
        Severity::Unknown => "📢",
    }
}

/// Cuts a stack trace at the character limit, appending a marker when
/// anything was dropped. The cut lands on a char boundary.
fn truncate_stack(stack: &str) -> Cow<'_, str> {
    match stack.char_indices().nth(STACK_LIMIT_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &stack[..cut], STACK_TRUNCATION_MARKER)),
        None => Cow::Borrowed(stack),
    }
}
