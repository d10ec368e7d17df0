use clap::Args;
use inspection_desk::error::AppError;
use inspection_desk::workflows::inspection::{recompute_condition_rating, Priority};
use inspection_desk::workflows::vendor::{
    transition_table, validate_transition, ActorRole, EntityKind, TransitionEdgeView,
};

#[derive(Args, Debug)]
pub(crate) struct TransitionsArgs {
    /// Entity kind: work_order, estimate, or invoice
    #[arg(value_parser = parse_kind)]
    pub(crate) kind: EntityKind,
    /// Only list edges this role may trigger
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: Option<ActorRole>,
    /// Emit JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Entity kind: work_order, estimate, or invoice
    #[arg(value_parser = parse_kind)]
    pub(crate) kind: EntityKind,
    /// Current status of the entity
    pub(crate) current: String,
    /// Requested status
    pub(crate) requested: String,
    /// Role requesting the change
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: ActorRole,
}

#[derive(Args, Debug)]
pub(crate) struct RatingArgs {
    /// Finding priorities (1-5); use '-' for a finding without a priority
    #[arg(num_args = 0.., allow_hyphen_values = true)]
    pub(crate) priorities: Vec<String>,
}

pub(crate) fn parse_kind(raw: &str) -> Result<EntityKind, String> {
    EntityKind::parse(raw)
        .ok_or_else(|| format!("unknown entity kind '{raw}' (work_order, estimate, invoice)"))
}

pub(crate) fn parse_role(raw: &str) -> Result<ActorRole, String> {
    ActorRole::parse(raw).ok_or_else(|| {
        format!("unknown role '{raw}' (vendor_owner, vendor_member, property_manager, admin)")
    })
}

pub(crate) fn parse_priority(raw: &str) -> Result<Option<Priority>, AppError> {
    let raw = raw.trim();
    if raw == "-" || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let value = raw
        .parse::<u8>()
        .map_err(|_| AppError::Usage(format!("'{raw}' is not a priority (1-5 or '-')")))?;
    Ok(Some(Priority::try_from(value)?))
}

pub(crate) fn run_transitions(args: TransitionsArgs) -> Result<(), AppError> {
    let TransitionsArgs { kind, role, json } = args;

    let edges = edges_for_role(kind, role);

    if json {
        let rendered = serde_json::to_string_pretty(&edges)
            .map_err(|err| AppError::Usage(format!("failed to render JSON: {err}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} transitions", kind.label());
    if let Some(role) = role {
        println!("Filtered to: {}", role.label());
    }
    for line in render_edges(&edges) {
        println!("{line}");
    }
    Ok(())
}

/// Edges of `kind`'s table, narrowed to those `role` may trigger when given.
pub(crate) fn edges_for_role(
    kind: EntityKind,
    role: Option<ActorRole>,
) -> Vec<TransitionEdgeView> {
    transition_table(kind)
        .into_iter()
        .filter(|edge| role.map_or(true, |role| edge.roles.contains(&role)))
        .collect()
}

pub(crate) fn render_edges(edges: &[TransitionEdgeView]) -> Vec<String> {
    let width = edges.iter().map(|edge| edge.from.len()).max().unwrap_or(0);
    edges
        .iter()
        .map(|edge| {
            let roles: Vec<&str> = edge.roles.iter().map(|role| role.as_str()).collect();
            format!(
                "  {:<width$} -> {:<18} [{}]",
                edge.from,
                edge.to,
                roles.join(", "),
                width = width
            )
        })
        .collect()
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        kind,
        current,
        requested,
        role,
    } = args;

    let next = validate_transition(kind, &current, &requested, role)?;
    println!("allowed: {} {} -> {} as {}", kind, current, next, role);
    Ok(())
}

pub(crate) fn run_rating(args: RatingArgs) -> Result<(), AppError> {
    let priorities = args
        .priorities
        .iter()
        .map(|raw| parse_priority(raw))
        .collect::<Result<Vec<_>, _>>()?;

    match recompute_condition_rating(&priorities) {
        Some(rating) => println!(
            "Condition rating: {} from {} finding(s)",
            rating,
            priorities.len()
        ),
        None => println!("Condition rating: unrated (no findings)"),
    }
    Ok(())
}
