use crate::report::schema::{
    FieldDef, FieldType, RecordSchema, Reportable, SubmitterFields, CREATED_AT, DELETED_AT, ID, UPDATED_AT,
};

pub struct Task;

pub const TASK: RecordSchema = RecordSchema {
    kind: "Task",
    slug: "tasks",
    table: "tasks",
    fields: &[
        FieldDef::uuid("id", ID),
        FieldDef::text("label", "label").required(),
        FieldDef::text("location", "location").required(),
        FieldDef::text("measurement", "measurement").required(),
        FieldDef::text("taskType", "task_type").required(),
        FieldDef::text("expectedCompletionDays", "expected_completion_days").required(),
        FieldDef::timestamp("startDate", "start_date").required(),
        FieldDef::timestamp("endDate", "end_date").required(),
        FieldDef::text("description", "description"),
        FieldDef::text("pipeMaterial", "pipe_material"),
        FieldDef::text("pipeDia", "pipe_dia"),
        FieldDef::text("remarks", "remarks"),
        FieldDef::text("workAssignedBy", "work_assigned_by"),
        FieldDef::number("latitude", "latitude").required(),
        FieldDef::number("longitude", "longitude").required(),
        FieldDef::timestamp("submittedAt", "submitted_at").required(),
        FieldDef::text("siteEngineerName", "site_engineer_name").required(),
        FieldDef::text("siteEngineerPhone", "site_engineer_phone").required(),
        FieldDef::timestamp("createdAt", CREATED_AT),
        FieldDef::timestamp("updatedAt", UPDATED_AT),
        FieldDef::internal(DELETED_AT, FieldType::Timestamp),
    ],
    submitter: SubmitterFields { name: "siteEngineerName", phone: "siteEngineerPhone" },
};

impl Reportable for Task {
    const SCHEMA: &'static RecordSchema = &TASK;
}
