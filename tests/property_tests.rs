use proptest::prelude::*;

use trellis::{
    CreateInput, GraphRepo, GraphSnapshot, NodeQuery, Patch, RelationPatch, RelationSpec,
    SubQuery, Value,
};

#[derive(Debug, Clone)]
enum Operation {
    CreateFolder { name: String },
    CreateFile { name: String },
    Link { folder: usize, file: usize },
    Unlink { folder: usize, file: usize },
    DeleteFolder { idx: usize },
    DeleteFile { idx: usize },
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(|name| Operation::CreateFolder { name }),
        "[a-z]{1,8}".prop_map(|name| Operation::CreateFile { name }),
        (0usize..16, 0usize..16).prop_map(|(folder, file)| Operation::Link { folder, file }),
        (0usize..16, 0usize..16).prop_map(|(folder, file)| Operation::Unlink { folder, file }),
        (0usize..16).prop_map(|idx| Operation::DeleteFolder { idx }),
        (0usize..16).prop_map(|idx| Operation::DeleteFile { idx }),
    ]
}

fn tree_schema() -> GraphSnapshot {
    GraphSnapshot::new()
        .relation(
            "folder",
            "files",
            RelationSpec::outbound("file").with_edge_kind("contains"),
        )
        .relation(
            "file",
            "folders",
            RelationSpec::inbound("folder").with_edge_kind("contains"),
        )
}

proptest! {
    #[test]
    fn edges_always_reference_live_nodes(ops in prop::collection::vec(arb_operation(), 1..80)) {
        let mut repo = GraphRepo::from_snapshot(tree_schema()).unwrap();
        let mut folders: Vec<String> = Vec::new();
        let mut files: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Operation::CreateFolder { name } => {
                    let id = repo
                        .create(CreateInput::new("folder").field("name", name))
                        .unwrap()
                        .id()
                        .to_owned();
                    folders.push(id);
                }
                Operation::CreateFile { name } => {
                    let id = repo
                        .create(CreateInput::new("file").field("name", name))
                        .unwrap()
                        .id()
                        .to_owned();
                    files.push(id);
                }
                Operation::Link { folder, file } => {
                    if folders.is_empty() || files.is_empty() {
                        continue;
                    }
                    let folder = &folders[folder % folders.len()];
                    let file = &files[file % files.len()];
                    let patch = Patch::new().relation(
                        "files",
                        RelationPatch::new().add(SubQuery::new().field("id", file.as_str())),
                    );
                    repo.update(folder.as_str(), &patch).unwrap();
                }
                Operation::Unlink { folder, file } => {
                    if folders.is_empty() || files.is_empty() {
                        continue;
                    }
                    let folder = &folders[folder % folders.len()];
                    let file = &files[file % files.len()];
                    let patch = Patch::new().relation(
                        "files",
                        RelationPatch::new().remove(SubQuery::new().field("id", file.as_str())),
                    );
                    repo.update(folder.as_str(), &patch).unwrap();
                }
                Operation::DeleteFolder { idx } => {
                    if folders.is_empty() {
                        continue;
                    }
                    let id = folders.remove(idx % folders.len());
                    repo.delete(id.as_str()).unwrap();
                }
                Operation::DeleteFile { idx } => {
                    if files.is_empty() {
                        continue;
                    }
                    let id = files.remove(idx % files.len());
                    repo.delete(id.as_str()).unwrap();
                }
            }
        }

        // Every edge is visible as a folder -> file pair whose endpoints
        // are both still alive, and the pair count equals the edge count.
        let mut linked_pairs = 0usize;
        for folder in &folders {
            let related = repo.get_related_nodes(folder, "files").unwrap();
            for file in &related {
                prop_assert!(files.contains(&file.id));
            }
            linked_pairs += related.len();
        }
        prop_assert_eq!(linked_pairs, repo.edge_count());
        prop_assert_eq!(folders.len() + files.len(), repo.node_count());

        // Draining the store drops every remaining edge with it.
        for id in folders.iter().chain(files.iter()) {
            repo.delete(id.as_str()).unwrap();
        }
        prop_assert_eq!(repo.node_count(), 0);
        prop_assert_eq!(repo.edge_count(), 0);
    }

    #[test]
    fn created_fields_round_trip_through_find(
        fields in prop::collection::btree_map(
            "[a-z]{1,8}",
            prop_oneof![
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(Value::Int),
                "[a-z0-9 ]{0,12}".prop_map(Value::String),
            ],
            0..6,
        )
    ) {
        // `id` and `kind` are engine-owned and never stored as plain fields.
        let mut fields = fields;
        fields.remove("id");
        fields.remove("kind");

        let mut repo = GraphRepo::new();
        let mut input = CreateInput::new("record");
        for (name, value) in &fields {
            input = input.field(name.clone(), value.clone());
        }
        let id = repo.create(input).unwrap().id().to_owned();

        let found = repo.find(id.as_str()).unwrap();
        prop_assert_eq!(&found[0].node().fields, &fields);
    }

    #[test]
    fn linking_twice_never_duplicates_edges(link_count in 1usize..6) {
        let mut repo = GraphRepo::from_snapshot(tree_schema()).unwrap();
        let folder = repo
            .create(CreateInput::new("folder"))
            .unwrap()
            .id()
            .to_owned();
        let file = repo.create(CreateInput::new("file")).unwrap().id().to_owned();

        let patch = Patch::new().relation(
            "files",
            RelationPatch::new().add(SubQuery::new().field("id", file.as_str())),
        );
        for _ in 0..link_count {
            repo.update(folder.as_str(), &patch).unwrap();
        }
        prop_assert_eq!(repo.edge_count(), 1);

        let folders = repo.find(NodeQuery::new("folder")).unwrap();
        prop_assert_eq!(folders[0].related("files").len(), 1);
    }
}
