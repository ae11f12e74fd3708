// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zone text output
//!
//! ```text
//! $ORIGIN example.org.
//! $TTL 3600            (when a default is given)
//! <apex SOA>
//! <apex records>       (SOA skipped, NSEC last)
//! <other owners>       (NSEC last per owner)
//! <apex SOA>           (repeated to close the zone)
//! ```

use crate::record::Record;
use crate::view::ZoneView;
use std::fmt::Write as _;
use std::path::Path;

const SOA: &str = "SOA";
const NSEC: &str = "NSEC";

impl ZoneView {
    /// Render the view as zone text with `origin` as apex
    pub fn render(&self, origin: &str, default_ttl: Option<u32>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "$ORIGIN {origin}");
        if let Some(ttl) = default_ttl {
            let _ = writeln!(out, "$TTL {ttl}");
        }

        let soa = self.records_of(origin).find(|record| record.rtype == SOA);
        if let Some(soa) = &soa {
            let _ = writeln!(out, "{soa}");
        }

        let apex = std::iter::once(origin);
        let others = self.owners().filter(|owner| *owner != origin);
        for owner in apex.chain(others) {
            self.render_owner(owner, &mut out);
        }

        if let Some(soa) = &soa {
            let _ = writeln!(out, "{soa}");
        }
        out
    }

    /// One owner's records: the first SOA is skipped, NSEC comes last
    fn render_owner(&self, owner: &str, out: &mut String) {
        let (nsec, rest): (Vec<Record>, Vec<Record>) =
            self.records_of(owner).partition(|record| record.rtype == NSEC);

        let mut soa_skipped = false;
        for record in rest {
            if record.rtype == SOA && !soa_skipped {
                soa_skipped = true;
                continue;
            }
            let _ = writeln!(out, "{record}");
        }
        for record in nsec {
            let _ = writeln!(out, "{record}");
        }
    }
}

/// Write a rendered zone to `path`, replacing any existing file
pub fn write_zone(
    view: &ZoneView,
    path: &Path,
    origin: &str,
    default_ttl: Option<u32>,
) -> std::io::Result<()> {
    std::fs::write(path, view.render(origin, default_ttl))?;
    tracing::debug!(path = %path.display(), records = view.len(), "zone written");
    Ok(())
}

#[cfg(test)]
#[path = "zonefile_tests.rs"]
mod tests;
