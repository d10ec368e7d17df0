use inspection_desk::workflows::vendor::{
    available_transitions, successors, transition_table, validate_transition, ActorRole,
    EntityKind, EntityStatus, EstimateStatus, InvoiceStatus, TransitionError, WorkOrderStatus,
};

#[test]
fn work_order_acceptance_and_jump_attempt() {
    let accepted = validate_transition(
        EntityKind::WorkOrder,
        "assigned",
        "accepted",
        ActorRole::VendorMember,
    )
    .expect("vendor member accepts an assigned work order");
    assert_eq!(accepted, EntityStatus::WorkOrder(WorkOrderStatus::Accepted));
    assert_eq!(accepted.to_string(), "accepted");

    let jump = validate_transition(
        EntityKind::WorkOrder,
        "assigned",
        "paid",
        ActorRole::VendorMember,
    );
    assert!(matches!(
        jump,
        Err(TransitionError::IllegalTransition { .. })
    ));
}

#[test]
fn invoice_approval_is_reserved_for_property_managers() {
    let refused = validate_transition(
        EntityKind::Invoice,
        "submitted",
        "pm_approved",
        ActorRole::VendorOwner,
    );
    assert!(matches!(refused, Err(TransitionError::Unauthorized { .. })));

    let approved = validate_transition(
        EntityKind::Invoice,
        "submitted",
        "pm_approved",
        ActorRole::PropertyManager,
    );
    assert_eq!(approved, Ok(EntityStatus::Invoice(InvoiceStatus::PmApproved)));
}

#[test]
fn estimate_revision_loop_returns_to_submitted() {
    let mut status = "draft";
    for (requested, role) in [
        ("submitted", ActorRole::VendorOwner),
        ("revision_requested", ActorRole::PropertyManager),
        ("submitted", ActorRole::VendorMember),
        ("approved", ActorRole::PropertyManager),
    ] {
        let next = validate_transition(EntityKind::Estimate, status, requested, role)
            .unwrap_or_else(|error| panic!("{status} -> {requested} refused: {error}"));
        status = next.as_str();
    }

    assert_eq!(status, "approved");
    assert!(successors(EntityStatus::Estimate(EstimateStatus::Approved)).is_empty());
}

#[test]
fn every_declared_status_is_reachable_or_initial() {
    for kind in EntityKind::ordered() {
        let table = transition_table(kind);
        let initial = table.first().expect("table has edges").from;
        let targets: Vec<&str> = table.iter().map(|edge| edge.to).collect();
        for edge in &table {
            assert!(
                edge.from == initial || targets.contains(&edge.from),
                "{kind}: '{}' cannot be reached",
                edge.from
            );
        }
    }
}

#[test]
fn admin_can_trigger_every_declared_edge() {
    for status in [
        EntityStatus::WorkOrder(WorkOrderStatus::Assigned),
        EntityStatus::WorkOrder(WorkOrderStatus::Completed),
        EntityStatus::Estimate(EstimateStatus::Submitted),
        EntityStatus::Invoice(InvoiceStatus::Submitted),
    ] {
        assert_eq!(
            available_transitions(status, ActorRole::Admin),
            successors(status)
        );
    }
}
