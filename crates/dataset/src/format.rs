//! Prompt formatting for founder profiles.

use outlier_core::FounderProfile;

/// Render one profile into the natural-language prompt fed to the
/// predictor agent.
///
/// Deterministic: the same profile always renders to byte-identical
/// output. Absent counts and rankings are omitted rather than rendered
/// as placeholders, and empty lists leave their section empty.
pub fn format_profile(profile: &FounderProfile) -> String {
    let mut out = format!(
        "This founder leads a startup in the {} industry.\n",
        profile.industry
    );

    if let Some(ipos) = profile.ipo_count {
        out.push_str(&format!("Previous IPOs: {}\n", ipos));
    }
    if let Some(acquisitions) = profile.acquisition_count {
        out.push_str(&format!("Previous acquisitions: {}\n", acquisitions));
    }

    out.push_str("Education:\n");
    for entry in &profile.education {
        match &entry.qs_ranking {
            Some(rank) => out.push_str(&format!(
                "* {} in {} (Institution QS rank {})\n",
                entry.degree, entry.field, rank
            )),
            None => out.push_str(&format!("* {} in {}\n", entry.degree, entry.field)),
        }
    }

    out.push_str("\nProfessional experience:\n");
    for job in &profile.jobs {
        out.push_str(&format!(
            "* {} for {} years in the `{}` industry ({})\n",
            job.role, job.duration, job.industry, job.company_size
        ));
    }

    out
}
