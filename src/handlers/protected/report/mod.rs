// Report kinds share one set of handlers, instantiated per `Reportable` type:
//
//   GET    /api/v1/{slug}          list (report query engine)
//   POST   /api/v1/{slug}          create
//   POST   /api/v1/{slug}/batch    insert-or-ignore by id
//   GET    /api/v1/{slug}/:id      show
//   PUT    /api/v1/{slug}/:id      partial update
//   DELETE /api/v1/{slug}/:id      delete

pub mod collection;
pub mod record;
