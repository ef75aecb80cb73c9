use super::{BumpKind, BumpResult, PolicyOutcome};
use crate::analyzer::BumpContext;
use crate::boundary::BoundaryWarning;
use crate::domain::{BranchContext, BumpLevel};
use crate::error::{GitBumpError, Result};
use tracing::{debug, info};

/// Semantic versioning: the required bump level decides the next version
pub struct SemVerPolicy<'a> {
    context: &'a BumpContext,
    branch: &'a BranchContext,
}

impl<'a> SemVerPolicy<'a> {
    pub fn new(context: &'a BumpContext, branch: &'a BranchContext) -> Self {
        SemVerPolicy { context, branch }
    }

    /// Compute the next version.
    ///
    /// Release branches only accept PATCH bumps; anything bigger is a policy
    /// violation regardless of the anchor.
    pub fn evaluate(&self) -> Result<PolicyOutcome> {
        let required = self.context.required_bump;

        if self.branch.is_release_branch() && required > BumpLevel::Patch {
            return Err(GitBumpError::policy(format!(
                "branch '{}' matches release pattern '{}' and only accepts patch bumps, \
                 but the commits since {} require a {} bump",
                self.branch.name,
                self.branch.release_pattern,
                self.anchor_label(),
                required
            )));
        }

        let Some(anchor) = self.context.anchor_version() else {
            debug!("No anchor version; nothing to bump");
            return Ok(PolicyOutcome::default());
        };

        let Some((next, applied)) = anchor.bump(required, self.context.initial_development)? else {
            return Ok(PolicyOutcome::unchanged(vec![BoundaryWarning::NothingToBump {
                current: anchor.to_string(),
            }]));
        };

        let Some(kind) = BumpKind::from_level(applied) else {
            return Ok(PolicyOutcome::default());
        };

        info!(from = %anchor, to = %next, kind = %kind, "Computed semver bump");
        Ok(PolicyOutcome {
            bump: Some(BumpResult {
                from: anchor.clone(),
                to: next,
                kind,
            }),
            warnings: Vec::new(),
        })
    }

    fn anchor_label(&self) -> String {
        self.context
            .anchor
            .as_ref()
            .map_or_else(|| "the start of history".to_string(), |a| format!("'{}'", a.tag.name))
    }
}
