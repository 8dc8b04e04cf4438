use pan_course::common::models::{Category, Course, Platform};
use pan_course::store::Database;
use pan_course::store::errors::StoreError;

fn setup_db() -> Database {
    let (db, report) = Database::open_in_memory().expect("打开数据库失败");
    assert_eq!(report.created_tables.len(), 2);
    db
}

fn sample_course(id: &str) -> Course {
    Course {
        id: id.to_string(),
        title: "Rust 系统编程".to_string(),
        category: "cat1".to_string(),
        image_url: "/uploads/cover.jpg".to_string(),
        share_link: "https://pan.quark.cn/s/abc123".to_string(),
        platform: Some(Platform::Quark),
        password: None,
        teacher: Some("张老师".to_string()),
        created_at: "2024-05-01T08:00:00.000Z".to_string(),
        total_episodes: None,
        watched_episodes: 0,
    }
}

fn category(id: &str, name: &str, icon: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
    }
}

// =============================================================================
// 课程
// =============================================================================

#[test]
fn test_create_then_list_round_trip() {
    let db = setup_db();
    let course = sample_course("c1");

    let created = db.courses().create(course.clone()).unwrap();
    assert_eq!(created, course);

    let courses = db.courses().list().unwrap();
    assert_eq!(courses, vec![course]);
}

#[test]
fn test_watched_episodes_defaults_to_zero_from_json() {
    let db = setup_db();
    let course: Course = serde_json::from_value(serde_json::json!({
        "id": "c1",
        "title": "Go 并发",
        "category": "cat1",
        "imageUrl": "/uploads/go.png",
        "shareLink": "https://www.alipan.com/s/xyz",
        "platform": "aliyun",
        "createdAt": "2024-05-01T08:00:00.000Z",
        "totalEpisodes": 12
    }))
    .unwrap();

    db.courses().create(course).unwrap();
    let stored = db.courses().get("c1").unwrap();
    assert_eq!(stored.watched_episodes, 0);
    assert_eq!(stored.total_episodes, Some(12));
    assert_eq!(stored.platform, Some(Platform::Aliyun));
}

#[test]
fn test_create_generates_id_and_timestamp() {
    let db = setup_db();
    let mut course = sample_course("");
    course.created_at = String::new();

    let created = db.courses().create(course).unwrap();
    assert!(!created.id.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&created.created_at).is_ok());
}

#[test]
fn test_create_duplicate_id_fails() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();

    let err = db.courses().create(sample_course("c1")).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));
    assert_eq!(db.courses().list().unwrap().len(), 1);
}

#[test]
fn test_create_missing_required_field_fails() {
    let db = setup_db();
    let mut course = sample_course("c1");
    course.title = "   ".to_string();

    let err = db.courses().create(course).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(db.courses().list().unwrap().is_empty());
}

#[test]
fn test_watched_cannot_exceed_total() {
    let db = setup_db();
    let mut course = sample_course("c1");
    course.total_episodes = Some(3);
    course.watched_episodes = 4;
    assert!(matches!(
        db.courses().create(course).unwrap_err(),
        StoreError::Validation(_)
    ));

    let mut course = sample_course("c2");
    course.total_episodes = Some(0);
    assert!(matches!(
        db.courses().create(course).unwrap_err(),
        StoreError::Validation(_)
    ));
}

#[test]
fn test_update_replaces_fields_but_keeps_created_at() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();

    let mut changed = sample_course("ignored");
    changed.title = "Rust 进阶".to_string();
    changed.teacher = None;
    changed.password = Some("8k2d".to_string());
    changed.created_at = "2030-01-01T00:00:00.000Z".to_string();
    changed.total_episodes = Some(20);
    changed.watched_episodes = 5;

    let updated = db.courses().update("c1", changed).unwrap();
    assert_eq!(updated.id, "c1");
    assert_eq!(updated.title, "Rust 进阶");
    assert_eq!(updated.teacher, None);
    assert_eq!(updated.password.as_deref(), Some("8k2d"));
    assert_eq!(updated.created_at, "2024-05-01T08:00:00.000Z");
    assert_eq!(updated.watched_episodes, 5);
    assert_eq!(db.courses().get("c1").unwrap(), updated);
}

#[test]
fn test_update_unknown_id_fails_and_leaves_collection() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();
    let before = db.courses().list().unwrap();

    let err = db.courses().update("missing", sample_course("missing")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(db.courses().list().unwrap(), before);
}

#[test]
fn test_delete_unknown_id_fails() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();

    db.courses().delete("c1").unwrap();
    assert!(db.courses().list().unwrap().is_empty());

    // 第二次删除同样报 NotFound
    let err = db.courses().delete("c1").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn test_progress_stops_at_total() {
    let db = setup_db();
    let mut course = sample_course("c1");
    course.total_episodes = Some(10);
    course.watched_episodes = 10;
    db.courses().create(course).unwrap();

    let after = db.courses().advance_progress("c1").unwrap();
    assert_eq!(after.watched_episodes, 10);
    assert!(after.is_finished());
}

#[test]
fn test_progress_advances_without_total() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();

    db.courses().advance_progress("c1").unwrap();
    let after = db.courses().advance_progress("c1").unwrap();
    assert_eq!(after.watched_episodes, 2);

    assert!(matches!(
        db.courses().advance_progress("missing").unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn test_progress_stops_at_u32_max_without_total() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();
    db.courses().set_progress("c1", u32::MAX).unwrap();

    let course = db.courses().advance_progress("c1").unwrap();
    assert_eq!(course.watched_episodes, u32::MAX);
    assert_eq!(db.courses().list().unwrap().len(), 1);
}

#[test]
fn test_create_without_platform_fails() {
    let db = setup_db();
    let mut course = sample_course("c1");
    course.platform = None;

    let err = db.courses().create(course).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn test_set_progress_validates_bound() {
    let db = setup_db();
    let mut course = sample_course("c1");
    course.total_episodes = Some(8);
    db.courses().create(course).unwrap();

    assert_eq!(db.courses().set_progress("c1", 8).unwrap().watched_episodes, 8);
    assert!(matches!(
        db.courses().set_progress("c1", 9).unwrap_err(),
        StoreError::Validation(_)
    ));
    assert_eq!(db.courses().get("c1").unwrap().watched_episodes, 8);
}

#[test]
fn test_list_by_category() {
    let db = setup_db();
    db.courses().create(sample_course("c1")).unwrap();
    let mut other = sample_course("c2");
    other.category = "cat2".to_string();
    db.courses().create(other).unwrap();

    let in_cat2 = db.courses().list_by_category("cat2").unwrap();
    assert_eq!(in_cat2.len(), 1);
    assert_eq!(in_cat2[0].id, "c2");
    assert!(db.courses().list_by_category("cat3").unwrap().is_empty());
}

// =============================================================================
// 分类
// =============================================================================

#[test]
fn test_duplicate_category_name_rejected() {
    let db = setup_db();
    let original = category("cat1", "Programming", "code-2");
    db.categories().create(original.clone()).unwrap();

    let err = db
        .categories()
        .create(category("cat2", "Programming", "brain"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "Programming"));

    assert_eq!(db.categories().list().unwrap(), vec![original]);
}

#[test]
fn test_category_name_is_case_sensitive() {
    let db = setup_db();
    db.categories()
        .create(category("cat1", "Programming", "code-2"))
        .unwrap();
    db.categories()
        .create(category("cat2", "programming", "terminal"))
        .unwrap();
    assert_eq!(db.categories().list().unwrap().len(), 2);
}

#[test]
fn test_invalid_icon_rejected() {
    let db = setup_db();
    let err = db
        .categories()
        .create(category("cat1", "Design", "sparkles"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidIcon(ref icon) if icon == "sparkles"));
    assert!(db.categories().list().unwrap().is_empty());
}

#[test]
fn test_empty_category_name_rejected() {
    let db = setup_db();
    let err = db
        .categories()
        .create(category("cat1", "  ", "globe"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn test_update_category() {
    let db = setup_db();
    db.categories()
        .create(category("cat1", "Programming", "code-2"))
        .unwrap();
    db.categories()
        .create(category("cat2", "Languages", "languages"))
        .unwrap();

    // 保留自身名称只换图标
    let updated = db
        .categories()
        .update("cat1", category("", "Programming", "terminal"))
        .unwrap();
    assert_eq!(updated, category("cat1", "Programming", "terminal"));

    // 改成别的分类的名称
    let err = db
        .categories()
        .update("cat1", category("cat1", "Languages", "terminal"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(_)));

    let err = db
        .categories()
        .update("missing", category("missing", "Art", "palette"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));

    // 不存在的 id 即使名称冲突也报 NotFound
    let err = db
        .categories()
        .update("missing", category("missing", "Programming", "code-2"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn test_delete_category() {
    let db = setup_db();
    db.categories()
        .create(category("cat1", "Programming", "code-2"))
        .unwrap();

    db.categories().delete("cat1").unwrap();
    assert!(matches!(
        db.categories().delete("cat1").unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn test_course_with_unknown_category_is_accepted() {
    let db = setup_db();
    let mut course = sample_course("c1");
    course.category = "nowhere".to_string();
    assert!(db.courses().create(course).is_ok());
}
