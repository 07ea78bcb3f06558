use crate::{
    api::{
        activity, attendance, class_group, department, reports, school, student, subject, teacher,
    },
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let mark_limiter = Arc::new(build_limiter(config.rate_mark_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            )
            // Token-gated by the AuthUser extractor itself
            .service(web::resource("/me").route(web::get().to(handlers::me))),
    );

    // Students mark attendance with a code, no account required.
    // Registered before the protected scope so the auth middleware
    // never sees it.
    cfg.service(
        web::resource("/attendance/mark")
            .wrap(mark_limiter)
            .route(web::post().to(attendance::mark_attendance)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/schools")
                    .service(
                        web::resource("")
                            .route(web::post().to(school::create_school))
                            .route(web::get().to(school::list_schools)),
                    )
                    .service(
                        web::resource("/{school_id}")
                            .route(web::get().to(school::get_school))
                            .route(web::put().to(school::update_school))
                            .route(web::delete().to(school::delete_school)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::post().to(department::create_department))
                            .route(web::get().to(department::list_departments)),
                    )
                    .service(
                        web::resource("/{department_id}")
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    ),
            )
            .service(
                web::scope("/classes")
                    .service(
                        web::resource("")
                            .route(web::post().to(class_group::create_class))
                            .route(web::get().to(class_group::list_classes)),
                    )
                    .service(
                        web::resource("/{class_id}")
                            .route(web::put().to(class_group::update_class))
                            .route(web::delete().to(class_group::delete_class)),
                    ),
            )
            .service(
                web::scope("/subjects")
                    .service(
                        web::resource("")
                            .route(web::post().to(subject::create_subject))
                            .route(web::get().to(subject::list_subjects)),
                    )
                    .service(
                        web::resource("/{course_code}")
                            .route(web::get().to(subject::get_subject))
                            .route(web::put().to(subject::update_subject))
                            .route(web::delete().to(subject::delete_subject)),
                    ),
            )
            .service(
                web::scope("/teachers")
                    .service(
                        web::resource("")
                            .route(web::post().to(teacher::create_teacher))
                            .route(web::get().to(teacher::list_teachers)),
                    )
                    .service(
                        web::resource("/{teacher_id}")
                            .route(web::get().to(teacher::get_teacher))
                            .route(web::put().to(teacher::update_teacher))
                            .route(web::delete().to(teacher::delete_teacher)),
                    ),
            )
            .service(
                web::scope("/students")
                    .service(
                        web::resource("")
                            .route(web::post().to(student::create_student))
                            .route(web::get().to(student::list_students)),
                    )
                    .service(
                        web::resource("/{roll_no}")
                            .route(web::get().to(student::get_student))
                            .route(web::put().to(student::update_student))
                            .route(web::delete().to(student::delete_student)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/register
                    .service(
                        web::resource("/register")
                            .route(web::post().to(attendance::create_register)),
                    )
                    // /attendance/registers
                    .service(
                        web::resource("/registers")
                            .route(web::get().to(attendance::list_registers)),
                    )
                    // /attendance/register/{unique_code}
                    .service(
                        web::resource("/register/{unique_code}")
                            .route(web::get().to(attendance::get_register)),
                    )
                    // /attendance/logs
                    .service(web::resource("/logs").route(web::get().to(attendance::list_logs)))
                    // /attendance/logs/{attendance_id}
                    .service(
                        web::resource("/logs/{attendance_id}")
                            .route(web::put().to(attendance::update_log)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(
                        web::resource("/attendance-summary")
                            .route(web::get().to(reports::attendance_summary)),
                    )
                    .service(
                        web::resource("/student-attendance/{roll_no}")
                            .route(web::get().to(reports::student_attendance)),
                    ),
            )
            .service(
                web::resource("/activities").route(web::get().to(activity::list_activities)),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
