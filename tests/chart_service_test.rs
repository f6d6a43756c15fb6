//! Tests for ChartService and the service container

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use orgtree::application::services::ChartService;
use orgtree::application::ApplicationError;
use orgtree::config::Settings;
use orgtree::domain::region::DEFAULT_REGION_NAME;
use orgtree::domain::{
    DomainError, DropPosition, Engine, NodeDraft, NodeId, NodePatch, Operation, OrgTree,
    SequentialIdGenerator, ZonePolicy,
};
use orgtree::infrastructure::di::ServiceContainer;
use orgtree::infrastructure::traits::RealFileSystem;

fn service(temp: &TempDir) -> ChartService {
    ChartService::new(
        Arc::new(RealFileSystem),
        Arc::new(SequentialIdGenerator::new("n")),
        Engine::default(),
        temp.path().join("regions.json"),
    )
}

fn child_ids(tree: &OrgTree, parent: &str) -> Vec<String> {
    tree.find_by_id(&NodeId::new(parent))
        .unwrap()
        .children
        .iter()
        .map(|c| c.id.to_string())
        .collect()
}

#[test]
fn given_empty_store_when_loading_regions_then_seeds_default_region() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);

    // Act
    let regions = chart.regions().unwrap();

    // Assert
    assert_eq!(regions.len(), 1);
    let region = regions.iter().next().unwrap();
    assert_eq!(region.name, DEFAULT_REGION_NAME);
    assert!(region.has_employees());
    assert!(chart.regions_path().exists());
}

#[test]
fn given_seeded_store_when_loading_twice_then_same_region_id() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);

    let first = chart.regions().unwrap();
    let second = chart.regions().unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_new_region_when_adding_child_then_persists_tree() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("LAX").unwrap();
    let node = chart
        .new_node(NodeDraft {
            department: Some("Export".into()),
            ..NodeDraft::new("Lena", "Agent")
        })
        .unwrap();

    // Act
    let outcome = chart
        .apply(
            &region.id,
            Operation::AddChild {
                parent: NodeId::new("root"),
                node,
            },
        )
        .unwrap();

    // Assert
    assert!(outcome.changed);
    assert!(outcome.rejection.is_none());
    let stored = chart.region("lax").unwrap();
    assert_eq!(child_ids(&stored.org_data, "root"), vec!["n1"]);
    assert_eq!(
        stored.org_data.find_by_id(&NodeId::new("n1")).unwrap().department(),
        Some("Export")
    );
}

#[test]
fn given_chain_seventy_deep_when_reloading_store_then_regions_load() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("DEEP").unwrap();
    let mut parent = NodeId::new("root");

    // Act
    for level in 0..70 {
        let node = chart
            .new_node(NodeDraft::new(format!("Level {level}"), "Lead"))
            .unwrap();
        let child = node.id.clone();
        let outcome = chart
            .apply(&region.id, Operation::AddChild { parent, node })
            .unwrap();
        assert!(outcome.changed);
        parent = child;
    }
    let reopened = service(&temp);

    // Assert
    let stored = reopened.region("DEEP").unwrap();
    assert_eq!(stored.org_data.depth(), 71);
    assert!(stored.org_data.contains(&parent));
}

#[test]
fn given_blank_name_when_creating_node_then_invalid_node() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);

    let result = chart.new_node(NodeDraft::new("  ", "Agent"));

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidNode(_)))
    ));
}

#[test]
fn given_illegal_operation_when_applying_then_store_untouched() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("SFO").unwrap();
    let before = std::fs::read_to_string(chart.regions_path()).unwrap();

    // Act
    let outcome = chart
        .apply(
            &region.id,
            Operation::Delete {
                node: NodeId::new("root"),
            },
        )
        .unwrap();

    // Assert
    assert!(!outcome.changed);
    assert_eq!(outcome.rejection, Some(DomainError::RootImmutable));
    assert_eq!(std::fs::read_to_string(chart.regions_path()).unwrap(), before);
}

#[test]
fn given_dry_run_check_when_zoning_conflicts_then_reports_reason() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("JFK").unwrap();
    for (name, dept) in [("Eve", "Export"), ("Ivo", "Import")] {
        let mut draft = NodeDraft::new(name, "Manager");
        draft.department = Some(dept.into());
        let node = chart.new_node(draft).unwrap();
        chart
            .apply(
                &region.id,
                Operation::AddChild {
                    parent: NodeId::new("root"),
                    node,
                },
            )
            .unwrap();
    }
    let op = Operation::Relocate {
        node: NodeId::new("n1"),
        target: NodeId::new("n2"),
        position: DropPosition::Below,
    };

    // Act
    let result = chart.check(&region.id, &op);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DepartmentConflict { .. }))
    ));
}

#[test]
fn given_staffed_region_when_deleting_then_refused() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("ORD2").unwrap();
    chart
        .apply(
            &region.id,
            Operation::Edit {
                node: NodeId::new("root"),
                patch: NodePatch::default().name("Kim"),
            },
        )
        .unwrap();

    let result = chart.delete_region(&region.id);

    assert!(matches!(result, Err(ApplicationError::RegionNotEmpty(_))));
}

#[test]
fn given_placeholder_region_when_deleting_then_removed() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("Temp").unwrap();
    let count = chart.regions().unwrap().len();

    chart.delete_region("temp").unwrap();

    assert_eq!(chart.regions().unwrap().len(), count - 1);
    assert!(matches!(
        chart.region(&region.id),
        Err(ApplicationError::RegionNotFound(_))
    ));
}

#[test]
fn given_blank_region_name_when_adding_then_invalid_input() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);

    assert!(matches!(
        chart.add_region("   "),
        Err(ApplicationError::InvalidInput(_))
    ));
}

#[test]
fn given_region_when_renaming_then_resolvable_by_new_name() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    let region = chart.add_region("BOS").unwrap();

    chart.rename_region(&region.id, "Boston").unwrap();

    assert_eq!(chart.region("boston").unwrap().id, region.id);
}

#[test]
fn given_region_when_rendering_then_shows_root_label() {
    let temp = TempDir::new().unwrap();
    let chart = service(&temp);
    chart.add_region("MIA").unwrap();

    let text = chart.render("MIA").unwrap();

    assert!(text.contains("MIA, Manager #root"));
}

#[test]
fn given_settings_when_building_container_then_services_use_data_dir() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        data_dir: temp.path().to_path_buf(),
        zoning: ZonePolicy::Inherited,
        ..Settings::default()
    };

    // Act
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(SequentialIdGenerator::new("t")),
    )
    .unwrap();
    let regions = container.chart.regions().unwrap();

    // Assert
    assert_eq!(container.chart.engine().policy(), ZonePolicy::Inherited);
    assert_eq!(
        container.chart.regions_path(),
        PathBuf::from(temp.path()).join("regions.json")
    );
    assert!(container.chart.regions_path().exists());
    assert_eq!(regions.len(), 1);
}
