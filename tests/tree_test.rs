//! Tests for DecisionTree construction, learning and enumeration

use std::collections::HashSet;

use rstest::rstest;

use animal_guess::domain::{
    Answer, Branch, DecisionTree, DomainError, GameSession, NodeRef, SessionState, Transition,
    DEFAULT_QUESTION,
};
use animal_guess::util::testing;

fn yes_leaf(tree: &DecisionTree) -> NodeRef {
    tree.child(tree.root(), Branch::Yes).unwrap()
}

fn no_leaf(tree: &DecisionTree) -> NodeRef {
    tree.child(tree.root(), Branch::No).unwrap()
}

/// Answers leading from the root to `node`.
fn path_to(tree: &DecisionTree, node: NodeRef) -> Vec<Answer> {
    let mut answers = Vec::new();
    let mut current = node;
    while let Some(parent) = tree.parent(current).unwrap() {
        let branch = if tree.child(parent, Branch::Yes).unwrap() == current {
            Branch::Yes
        } else {
            Branch::No
        };
        answers.push(Answer::from(branch));
        current = parent;
    }
    answers.reverse();
    answers
}

fn leaves(tree: &DecisionTree) -> Vec<NodeRef> {
    tree.iter()
        .filter(|(_, node)| node.is_leaf())
        .map(|(node_ref, _)| node_ref)
        .collect()
}

/// Dog/Cat/Snake/Lizard tree with depth 3 on both sides.
fn grown_tree() -> DecisionTree {
    let mut tree = DecisionTree::new();
    tree.learn(yes_leaf(&tree), "Cat", "Does it bark?", Branch::No)
        .unwrap();
    tree.learn(no_leaf(&tree), "Lizard", "Does it have legs?", Branch::Yes)
        .unwrap();
    tree
}

// ============================================================
// Default Shape Tests
// ============================================================

#[test]
fn given_new_tree_when_collecting_labels_then_returns_default_pair() {
    testing::init_test_setup();
    let tree = DecisionTree::new();

    assert_eq!(tree.collect_labels(), vec!["Dog", "Snake"]);
    assert_eq!(tree.root_node().question(), Some(DEFAULT_QUESTION));
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.question_count(), 1);
    assert_eq!(tree.leaf_count(), 2);
}

#[test]
fn given_grown_tree_when_resetting_then_returns_to_default_shape() {
    let mut tree = grown_tree();
    assert_eq!(tree.node_count(), 7);

    tree.reset_to_default();

    assert_eq!(tree.collect_labels(), vec!["Dog", "Snake"]);
    assert_eq!(tree.root_node().question(), Some(DEFAULT_QUESTION));
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.depth(), 2);
}

// ============================================================
// Learn Tests
// ============================================================

#[rstest]
#[case(Branch::Yes, "Wolf", "Dog")]
#[case(Branch::No, "Dog", "Wolf")]
fn given_leaf_when_learning_then_branch_selects_child_for_new_label(
    #[case] branch: Branch,
    #[case] expected_yes: &str,
    #[case] expected_no: &str,
) {
    let mut tree = DecisionTree::new();
    let dog = yes_leaf(&tree);

    tree.learn(dog, "Wolf", "Does it howl?", branch).unwrap();

    let node = tree.node(dog).unwrap();
    assert!(!node.is_leaf());
    assert_eq!(node.question(), Some("Does it howl?"));
    let yes = tree.child(dog, Branch::Yes).unwrap();
    let no = tree.child(dog, Branch::No).unwrap();
    assert_eq!(tree.node(yes).unwrap().label(), Some(expected_yes));
    assert_eq!(tree.node(no).unwrap().label(), Some(expected_no));
}

#[test]
fn given_any_leaf_when_learning_then_keeps_old_labels_and_adds_new_one() {
    let tree = grown_tree();
    for (position, _) in leaves(&tree).iter().enumerate() {
        let mut tree = grown_tree();
        let target = leaves(&tree)[position];
        let mut expected: Vec<String> = tree.collect_labels();
        expected.push("Yak".to_string());
        expected.sort();

        tree.learn(target, "Yak", "Is it hairy?", Branch::Yes).unwrap();

        let mut labels = tree.collect_labels();
        labels.sort();
        assert_eq!(labels, expected);
    }
}

#[test]
fn given_tree_when_learning_repeatedly_then_each_learn_adds_two_nodes() {
    let mut tree = DecisionTree::new();
    for round in 0..5 {
        let before = tree.node_count();
        let questions = tree.question_count();
        let target = *leaves(&tree).last().unwrap();

        tree.learn(target, &format!("Animal{round}"), "Q?", Branch::No)
            .unwrap();

        assert_eq!(tree.node_count(), before + 2);
        assert_eq!(tree.question_count(), questions + 1);
    }
    assert_eq!(tree.leaf_count(), 7);
}

#[test]
fn given_grown_tree_when_collecting_labels_then_yes_branch_comes_first() {
    let tree = grown_tree();
    assert_eq!(tree.collect_labels(), vec!["Dog", "Cat", "Lizard", "Snake"]);
}

#[test]
fn given_empty_strings_when_learning_then_accepted_verbatim() {
    let mut tree = DecisionTree::new();
    let dog = yes_leaf(&tree);

    tree.learn(dog, "", "", Branch::Yes).unwrap();

    assert_eq!(tree.collect_labels(), vec!["", "Dog", "Snake"]);
}

// ============================================================
// Invalid Reference Tests
// ============================================================

#[test]
fn given_leaf_from_other_tree_when_learning_then_invalid_reference() {
    let other = DecisionTree::new();
    let foreign = yes_leaf(&other);
    let mut tree = DecisionTree::new();

    let err = tree
        .learn(foreign, "Cat", "Does it bark?", Branch::No)
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidReference { .. }));
    assert_eq!(tree.collect_labels(), vec!["Dog", "Snake"]);
    assert_eq!(tree.node_count(), 3);
}

#[test]
fn given_leaf_from_before_reset_when_learning_then_invalid_reference() {
    let mut tree = DecisionTree::new();
    let stale = yes_leaf(&tree);
    tree.reset_to_default();

    let err = tree
        .learn(stale, "Cat", "Does it bark?", Branch::No)
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidReference { .. }));
    assert_eq!(tree.collect_labels(), vec!["Dog", "Snake"]);
    assert_eq!(tree.node_count(), 3);
}

#[test]
fn given_question_node_when_learning_then_invalid_reference() {
    let mut tree = DecisionTree::new();
    let root = tree.root();

    let err = tree.learn(root, "Cat", "Does it purr?", Branch::Yes).unwrap_err();

    assert!(matches!(err, DomainError::InvalidReference { .. }));
    assert_eq!(tree.root_node().question(), Some(DEFAULT_QUESTION));
}

#[test]
fn given_invalid_reference_when_displaying_then_names_reason() {
    let other = DecisionTree::new();
    let mut tree = DecisionTree::new();

    let err = tree
        .learn(yes_leaf(&other), "Cat", "Q?", Branch::No)
        .unwrap_err();

    assert!(err.to_string().contains("another tree"));
}

// ============================================================
// Traversal Termination Tests
// ============================================================

#[test]
fn given_grown_tree_when_following_path_then_reaches_leaf_in_depth_steps() {
    let mut tree = grown_tree();
    let cat = leaves(&tree)[1];
    tree.learn(cat, "Lion", "Does it roar?", Branch::Yes).unwrap();

    for leaf in leaves(&tree) {
        let answers = path_to(&tree, leaf);
        let mut session = GameSession::start(&tree);
        let mut visited = HashSet::from([session.cursor()]);
        let mut steps = 0;

        for answer in answers {
            let transition = session.answer(&tree, answer).unwrap();
            assert_ne!(transition, Transition::Reprompt);
            steps += 1;
            assert!(visited.insert(session.cursor()), "node revisited");
        }

        assert_eq!(session.state(), SessionState::AwaitingConfirmation);
        assert_eq!(session.cursor(), leaf);
        assert_eq!(steps, tree.depth_of(leaf).unwrap());
    }
    assert_eq!(tree.depth(), 4);
}
