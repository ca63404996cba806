use ajungem::{
    access::ReportScope,
    db::{self, Profile, Role, ACTIVITY_TYPES},
    events::store::{self as events, NewEvent},
    messages::store::{self as messages, Addressing, NewMessage},
    profiles::store as profiles,
    reports::store::{self as reports, NewReport},
    unread,
};
use sqlx::SqlitePool;
use time::{macros::date, Duration};
use uuid::Uuid;

async fn profile(db_pool: &SqlitePool, email: &str, role: Role) -> Profile {
    profiles::create_profile(db_pool, email, None, role).await.unwrap()
}

async fn send(db_pool: &SqlitePool, from: &Profile, addressing: Addressing, subject: &str) -> db::Message {
    messages::insert_message(
        db_pool,
        NewMessage {
            sender_id: from.id,
            addressing,
            subject: subject.to_owned(),
            content: "Body".to_owned(),
        },
    )
    .await
    .unwrap()
}

fn report_by(volunteer: &Profile, center_name: &str, event_id: Option<Uuid>) -> NewReport {
    NewReport {
        event_id,
        volunteer_id: volunteer.id,
        email: volunteer.email.clone(),
        visit_date: date!(2026-03-14),
        duration_hours: 2.0,
        center_name: center_name.to_owned(),
        location: "Iasi".to_owned(),
        activity_type: ACTIVITY_TYPES[2].to_owned(),
        children_count: 8,
        children_names: "Ioana, Radu".to_owned(),
        activity_description: "Maths homework".to_owned(),
        testimonials: None,
        child_observations: None,
    }
}

#[tokio::test]
async fn broadcast_and_recipient_are_mutually_exclusive() {
    let db_pool = db::memory().await.unwrap();
    let admin = profile(&db_pool, "a@example.org", Role::Admin).await;
    let volunteer = profile(&db_pool, "b@example.org", Role::Volunteer).await;

    let both = sqlx::query(
        "INSERT INTO messages (id,sender_id,recipient_id,subject,content,is_broadcast,created_at) \
         VALUES (?,?,?,'s','c',1,?)",
    )
    .bind(Uuid::now_v7())
    .bind(admin.id)
    .bind(volunteer.id)
    .bind(db::now())
    .execute(&db_pool)
    .await;
    assert!(both.is_err());

    let neither = sqlx::query(
        "INSERT INTO messages (id,sender_id,recipient_id,subject,content,is_broadcast,created_at) \
         VALUES (?,?,NULL,'s','c',0,?)",
    )
    .bind(Uuid::now_v7())
    .bind(admin.id)
    .bind(db::now())
    .execute(&db_pool)
    .await;
    assert!(neither.is_err());

    let broadcast = send(&db_pool, &admin, Addressing::Broadcast, "All hands").await;
    assert!(broadcast.is_broadcast);
    assert_eq!(broadcast.recipient_id, None);
    assert_eq!(broadcast.read_at, None);
}

#[tokio::test]
async fn inbox_count_matches_unread_messages() {
    let db_pool = db::memory().await.unwrap();
    let admin = profile(&db_pool, "a@example.org", Role::Admin).await;
    let b = profile(&db_pool, "b@example.org", Role::Volunteer).await;
    let c = profile(&db_pool, "c@example.org", Role::Volunteer).await;

    send(&db_pool, &admin, Addressing::Broadcast, "All hands").await;
    let to_b = send(&db_pool, &admin, Addressing::Direct(b.id), "For B").await;
    send(&db_pool, &admin, Addressing::Direct(c.id), "For C").await;
    send(&db_pool, &b, Addressing::Direct(c.id), "B to C").await;

    let inbox = messages::inbox(&db_pool, b.id).await.unwrap();
    let subjects: Vec<&str> = inbox.iter().map(|listing| listing.message.subject.as_str()).collect();
    assert_eq!(inbox.len(), 2);
    assert!(subjects.contains(&"All hands"));
    assert!(subjects.contains(&"For B"));
    assert_eq!(
        messages::count_unread(&db_pool, b.id).await.unwrap() as usize,
        unread::unread_count(inbox.iter().map(|listing| &listing.message)),
    );
    assert_eq!(messages::count_unread(&db_pool, b.id).await.unwrap(), 2);

    let sent = messages::sent(&db_pool, b.id).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].party.author_email.as_deref(), Some("c@example.org"));

    assert!(messages::set_read_at(&db_pool, to_b.id, b.id, db::now()).await.unwrap());
    assert_eq!(messages::count_unread(&db_pool, b.id).await.unwrap(), 1);

    // an admin's own broadcast sits in their sent list, not their inbox
    assert!(messages::inbox(&db_pool, admin.id).await.unwrap().is_empty());
    assert_eq!(messages::count_unread(&db_pool, admin.id).await.unwrap(), 0);
    let admin_sent = messages::sent(&db_pool, admin.id).await.unwrap();
    assert!(admin_sent.iter().any(|listing| listing.message.is_broadcast));
    // sent messages never count towards the sender's unread total
    assert_eq!(messages::count_unread(&db_pool, c.id).await.unwrap(), 3);
}

#[tokio::test]
async fn read_transition_only_touches_the_recipients_row() {
    let db_pool = db::memory().await.unwrap();
    let admin = profile(&db_pool, "a@example.org", Role::Admin).await;
    let b = profile(&db_pool, "b@example.org", Role::Volunteer).await;
    let c = profile(&db_pool, "c@example.org", Role::Volunteer).await;

    let to_b = send(&db_pool, &admin, Addressing::Direct(b.id), "For B").await;
    let broadcast = send(&db_pool, &admin, Addressing::Broadcast, "All hands").await;

    assert!(!messages::set_read_at(&db_pool, to_b.id, c.id, db::now()).await.unwrap());
    assert!(!messages::set_read_at(&db_pool, broadcast.id, b.id, db::now()).await.unwrap());

    let read_at = db::now();
    assert!(messages::set_read_at(&db_pool, to_b.id, b.id, read_at).await.unwrap());
    let reloaded = messages::find_visible(&db_pool, to_b.id, b.id).await.unwrap().unwrap();
    assert_eq!(reloaded.message.read_at, Some(read_at));
    assert_eq!(reloaded.party.author_email.as_deref(), Some("a@example.org"));
}

#[tokio::test]
async fn visibility_filter_hides_other_peoples_mail() {
    let db_pool = db::memory().await.unwrap();
    let admin = profile(&db_pool, "a@example.org", Role::Admin).await;
    let b = profile(&db_pool, "b@example.org", Role::Volunteer).await;
    let c = profile(&db_pool, "c@example.org", Role::Volunteer).await;

    let to_b = send(&db_pool, &admin, Addressing::Direct(b.id), "For B").await;
    let broadcast = send(&db_pool, &admin, Addressing::Broadcast, "All hands").await;

    assert!(messages::find_visible(&db_pool, to_b.id, b.id).await.unwrap().is_some());
    assert!(messages::find_visible(&db_pool, to_b.id, admin.id).await.unwrap().is_some());
    assert!(messages::find_visible(&db_pool, to_b.id, c.id).await.unwrap().is_none());
    assert!(messages::exists(&db_pool, to_b.id).await.unwrap());
    assert!(messages::find_visible(&db_pool, broadcast.id, c.id).await.unwrap().is_some());

    assert!(!messages::exists(&db_pool, Uuid::now_v7()).await.unwrap());
}

#[tokio::test]
async fn report_scopes_and_counts() {
    let db_pool = db::memory().await.unwrap();
    let admin = profile(&db_pool, "a@example.org", Role::Admin).await;
    let e = profile(&db_pool, "e@example.org", Role::Volunteer).await;
    let f = profile(&db_pool, "f@example.org", Role::Volunteer).await;

    reports::insert_report(&db_pool, report_by(&e, "Casa Soarelui", None)).await.unwrap();
    reports::insert_report(&db_pool, report_by(&f, "Casa Luminii", None)).await.unwrap();

    let others = reports::list_scoped(&db_pool, e.id, ReportScope::Others).await.unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].report.center_name, "Casa Luminii");
    assert_eq!(others[0].author.author_email.as_deref(), Some("f@example.org"));

    let all = reports::list_scoped(&db_pool, admin.id, ReportScope::All).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = reports::list_by_volunteer(&db_pool, e.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].report.visit_date, date!(2026-03-14));

    assert_eq!(reports::count_reports_by(&db_pool, e.id).await.unwrap(), 1);
    assert_eq!(reports::count_reports_by(&db_pool, admin.id).await.unwrap(), 0);
    assert_eq!(reports::count_reports(&db_pool).await.unwrap(), 2);
    assert_eq!(reports::list_recent(&db_pool, 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn negative_children_count_is_rejected_by_the_table() {
    let db_pool = db::memory().await.unwrap();
    let e = profile(&db_pool, "e@example.org", Role::Volunteer).await;

    let mut bad = report_by(&e, "Casa Soarelui", None);
    bad.children_count = -1;
    assert!(reports::insert_report(&db_pool, bad).await.is_err());
}

#[tokio::test]
async fn events_split_around_now_and_collect_reports() {
    let db_pool = db::memory().await.unwrap();
    let admin = profile(&db_pool, "a@example.org", Role::Admin).await;
    let e = profile(&db_pool, "e@example.org", Role::Volunteer).await;
    let now = db::now();

    let event = |title: &str, offset: Duration| NewEvent {
        title: title.to_owned(),
        description: None,
        center_name: "Casa Soarelui".to_owned(),
        location: "Cluj-Napoca".to_owned(),
        scheduled_date: now + offset,
        duration_hours: Some(2.0),
        activity_type: None,
        created_by: admin.id,
    };

    let past = events::insert_event(&db_pool, event("Winter party", -Duration::days(30))).await.unwrap();
    events::insert_event(&db_pool, event("Spring workshop", Duration::days(7))).await.unwrap();
    events::insert_event(&db_pool, event("Summer camp", Duration::days(60))).await.unwrap();

    let upcoming = events::list_upcoming(&db_pool, now, None).await.unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|listing| listing.event.title.as_str()).collect();
    assert_eq!(titles, ["Spring workshop", "Summer camp"]);
    assert_eq!(upcoming[0].organiser.author_email.as_deref(), Some("a@example.org"));
    assert_eq!(events::list_upcoming(&db_pool, now, Some(1)).await.unwrap().len(), 1);

    let gone = events::list_past(&db_pool, now).await.unwrap();
    assert_eq!(gone.len(), 1);
    assert_eq!(gone[0].event.id, past.id);

    assert_eq!(events::list_choices(&db_pool).await.unwrap().len(), 3);

    reports::insert_report(&db_pool, report_by(&e, "Casa Soarelui", Some(past.id))).await.unwrap();
    reports::insert_report(&db_pool, report_by(&e, "Elsewhere", None)).await.unwrap();
    let linked = reports::list_for_event(&db_pool, past.id).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].report.event_id, Some(past.id));
}

#[tokio::test]
async fn recipients_exclude_the_viewer() {
    let db_pool = db::memory().await.unwrap();
    let a = profile(&db_pool, "a@example.org", Role::Admin).await;
    let b = profile(&db_pool, "b@example.org", Role::Volunteer).await;

    let recipients = profiles::list_recipients(&db_pool, a.id).await.unwrap();
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].id, b.id);
    assert_eq!(
        profiles::find_profile_by_email(&db_pool, "b@example.org").await.unwrap().map(|p| p.id),
        Some(b.id)
    );
    assert!(profiles::create_profile(&db_pool, "b@example.org", None, Role::Volunteer).await.is_err());
}
