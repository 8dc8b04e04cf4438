use pan_course::cache::{Mutation, RecordCache};
use pan_course::common::models::{Category, Course, Platform};
use pan_course::store::Database;
use pan_course::store::errors::StoreError;

fn category(id: &str, name: &str, icon: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
    }
}

fn course(id: &str, category: &str) -> Course {
    Course {
        id: id.to_string(),
        title: format!("课程 {}", id),
        category: category.to_string(),
        image_url: "/uploads/cover.jpg".to_string(),
        share_link: "https://www.alipan.com/s/abc".to_string(),
        platform: Some(Platform::Aliyun),
        password: None,
        teacher: None,
        created_at: "2024-05-01T08:00:00.000Z".to_string(),
        total_episodes: None,
        watched_episodes: 0,
    }
}

#[test]
fn test_applied_is_pure_transition() {
    let cache = RecordCache::new(vec![category("a", "A", "brain")]);

    let cache = cache.applied(Mutation::Created(category("b", "B", "globe")));
    assert_eq!(cache.len(), 2);

    let cache = cache.applied(Mutation::Updated("a".to_string(), category("a", "A2", "rocket")));
    assert_eq!(cache.get("a").unwrap().name, "A2");

    let cache = cache.applied(Mutation::Deleted("b".to_string()));
    assert_eq!(cache.items(), &[category("a", "A2", "rocket")]);
}

#[test]
fn test_failed_write_leaves_cache_unchanged() {
    let mut cache = RecordCache::new(vec![category("a", "A", "brain")]);
    let before = cache.items().to_vec();

    let result: Result<(), &str> = cache.write_through(Err("server down"));
    assert_eq!(result, Err("server down"));
    assert_eq!(cache.items(), before.as_slice());
}

#[test]
fn test_write_through_against_store() {
    let (db, _) = Database::open_in_memory().unwrap();
    let mut categories: RecordCache<Category> = RecordCache::default();
    categories
        .refresh(db.categories().list())
        .unwrap();
    assert!(categories.is_empty());

    categories
        .create(|| db.categories().create(category("c1", "Programming", "code-2")))
        .unwrap();
    assert_eq!(categories.len(), 1);

    // 服务端拒绝时缓存不变
    let err = categories
        .create(|| db.categories().create(category("c2", "Programming", "brain")))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(_)));
    assert_eq!(categories.len(), 1);

    let err = categories
        .delete("nope", || db.categories().delete("nope"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(categories.len(), 1);

    categories
        .update("c1", || {
            db.categories()
                .update("c1", category("c1", "Programming", "terminal"))
        })
        .unwrap();
    assert_eq!(categories.get("c1").unwrap().icon, "terminal");
    assert_eq!(categories.items(), db.categories().list().unwrap().as_slice());

    categories
        .delete("c1", || db.categories().delete("c1"))
        .unwrap();
    assert!(categories.is_empty());
}

#[test]
fn test_course_cache_filters_by_category() {
    let cache = RecordCache::new(vec![
        course("1", "programming"),
        course("2", "design"),
        course("3", "programming"),
    ]);

    let ids: Vec<&str> = cache
        .in_category("programming")
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
}
