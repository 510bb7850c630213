use std::sync::Arc;

use guide_core::model::{
    DisplayedUnit, LayoutSettings, LinkCatalog, ModuleId, NavigationEntry, ProblemId, ProblemRef,
    ProgressState, SolutionId, TableOfContents, TocHeading, UserId,
};
use guide_core::time::fixed_clock;
use services::{AppServices, CelebrationCounter};
use storage::repository::{ProgressRecord, Storage};

fn catalog() -> LinkCatalog {
    LinkCatalog::new(vec![
        NavigationEntry::new(
            ModuleId::new("mod1"),
            vec![ProblemRef::new(ProblemId::new("p1")).with_solution(SolutionId::new("sol1"))],
        ),
        NavigationEntry::new(
            ModuleId::new("mod2"),
            vec![ProblemRef::new(ProblemId::new("p2"))],
        ),
    ])
}

fn heading(value: &str) -> TocHeading {
    TocHeading {
        depth: 2,
        value: value.to_owned(),
        slug: value.to_lowercase(),
    }
}

fn app(counter: &Arc<CelebrationCounter>) -> AppServices {
    app_with_storage(&Storage::in_memory(), counter)
}

fn app_with_storage(storage: &Storage, counter: &Arc<CelebrationCounter>) -> AppServices {
    AppServices::new(
        storage,
        fixed_clock(),
        LayoutSettings::default().with_language("java"),
        catalog(),
        counter.clone(),
    )
}

#[tokio::test]
async fn solution_page_highlights_owning_module() {
    let counter = Arc::new(CelebrationCounter::new());
    let app = app(&counter);

    let ctx = app
        .layout()
        .build_context(
            UserId::random(),
            DisplayedUnit::solution("sol1"),
            &TableOfContents::default(),
        )
        .await
        .expect("build context");

    assert_eq!(ctx.active_ids().len(), 1);
    assert!(ctx.is_active(&ModuleId::new("mod1")));
    assert!(ctx.problem_ids().is_empty());
    assert_eq!(ctx.current_progress(), ProgressState::NotStarted);
}

#[tokio::test]
async fn module_page_lists_its_problems_and_language_toc() {
    let counter = Arc::new(CelebrationCounter::new());
    let app = app(&counter);
    let toc = TableOfContents::default()
        .with_language("cpp", vec![heading("Cpp")])
        .with_language("java", vec![heading("Java"), heading("Usage")]);

    let ctx = app
        .layout()
        .build_context(UserId::random(), DisplayedUnit::module("mod2"), &toc)
        .await
        .expect("build context");

    assert!(ctx.is_active(&ModuleId::new("mod2")));
    assert!(!ctx.is_active(&ModuleId::new("mod1")));
    assert_eq!(ctx.problem_ids(), &[ProblemId::new("p2")]);
    assert_eq!(
        ctx.owning_module(&ProblemId::new("p1")),
        Some(&ModuleId::new("mod1"))
    );
    assert_eq!(ctx.table_of_contents().len(), 2);
    assert_eq!(ctx.navigation_catalog().len(), 2);
}

#[tokio::test]
async fn unknown_module_renders_without_highlight() {
    let counter = Arc::new(CelebrationCounter::new());
    let app = app(&counter);

    let ctx = app
        .layout()
        .build_context(
            UserId::random(),
            DisplayedUnit::module("missing"),
            &TableOfContents::default(),
        )
        .await
        .expect("missing module is not an error");

    assert!(ctx.active_ids().is_empty());
    assert!(ctx.problem_ids().is_empty());
}

#[tokio::test]
async fn sequential_changes_celebrate_each_step_up() {
    let counter = Arc::new(CelebrationCounter::new());
    let app = app(&counter);
    let user = UserId::random();

    let ctx = app
        .layout()
        .build_context(user, DisplayedUnit::module("mod1"), &TableOfContents::default())
        .await
        .expect("build context");

    let first = ctx
        .request_progress_change(ProgressState::Practicing)
        .await
        .expect("first change");
    assert_eq!(first.next, ProgressState::Practicing);
    assert!(first.should_celebrate);

    let second = ctx
        .request_progress_change(ProgressState::Complete)
        .await
        .expect("second change");
    assert_eq!(second.next, ProgressState::Complete);
    assert!(second.should_celebrate);

    let back = ctx
        .request_progress_change(ProgressState::Practicing)
        .await
        .expect("step back");
    assert!(!back.should_celebrate);
    assert_eq!(counter.count(), 2);

    let rebuilt = app
        .layout()
        .build_context(user, DisplayedUnit::module("mod1"), &TableOfContents::default())
        .await
        .expect("rebuild context");
    assert_eq!(rebuilt.current_progress(), ProgressState::Practicing);
}

#[tokio::test]
async fn concurrent_changes_apply_in_arrival_order() {
    let counter = Arc::new(CelebrationCounter::new());
    let app = app(&counter);

    let ctx = app
        .layout()
        .build_context(
            UserId::random(),
            DisplayedUnit::module("mod2"),
            &TableOfContents::default(),
        )
        .await
        .expect("build context");

    let (first, second) = tokio::join!(
        ctx.request_progress_change(ProgressState::Practicing),
        ctx.request_progress_change(ProgressState::Complete),
    );

    assert_eq!(first.expect("first").next, ProgressState::Practicing);
    let second = second.expect("second");
    assert_eq!(second.next, ProgressState::Complete);
    assert!(second.should_celebrate);
    assert_eq!(counter.count(), 2);
}

#[tokio::test]
async fn rerender_sees_progress_written_elsewhere() {
    let counter = Arc::new(CelebrationCounter::new());
    let storage = Storage::in_memory();
    let app = app_with_storage(&storage, &counter);
    let user = UserId::random();
    let unit = DisplayedUnit::module("mod1");

    let first = app
        .layout()
        .build_context(user, unit.clone(), &TableOfContents::default())
        .await
        .expect("first render");
    assert_eq!(first.current_progress(), ProgressState::NotStarted);

    // Another device finishes the module.
    storage
        .progress
        .upsert_progress(&ProgressRecord::new(
            user,
            "mod1",
            ProgressState::Complete,
            fixed_clock().now(),
        ))
        .await
        .expect("external write");

    let second = app
        .layout()
        .build_context(user, unit, &TableOfContents::default())
        .await
        .expect("second render");
    assert_eq!(second.current_progress(), ProgressState::Complete);

    let decision = second
        .request_progress_change(ProgressState::Practicing)
        .await
        .expect("step back");
    assert_eq!(decision.next, ProgressState::Practicing);
    assert!(!decision.should_celebrate);
    assert_eq!(counter.count(), 0);
}

#[test]
fn content_index_reload_replaces_catalog() {
    let counter = Arc::new(CelebrationCounter::new());
    let mut app = app(&counter);

    app.reload_content_index(
        r#"{"edges":[{"node":{"frontmatter":{"id":"graphs"},"fields":{"division":"gold"},"problems":[{"uniqueID":"g1","solID":null}]}}]}"#,
    )
    .expect("reload");

    let catalog = app.layout().catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(
        catalog.iter().next().map(|entry| entry.id.clone()),
        Some(ModuleId::new("graphs"))
    );

    assert!(app.reload_content_index("not json").is_err());
    assert_eq!(app.layout().catalog().len(), 1);
}
