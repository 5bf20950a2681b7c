pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL CHECK (role IN ('HIRING_MANAGER', 'OPS_TEAM', 'SUPPLIER', 'APPROVER')),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vendors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE,
    email TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sows (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    template_type TEXT NOT NULL DEFAULT 'MANAGED_PROJECT'
        CHECK (template_type IN ('MANAGED_PROJECT', 'MANAGED_SERVICE', 'T_M')),
    language TEXT,
    effective_date TEXT,
    end_date TEXT,
    cost_center TEXT,
    location TEXT,
    out_of_scope TEXT,
    assumptions TEXT,
    client_poc_name TEXT,
    client_poc_email TEXT,
    total_value_cents INTEGER,
    payment_terms TEXT,
    status TEXT NOT NULL DEFAULT 'DRAFT'
        CHECK (status IN ('DRAFT', 'SUBMITTED', 'OPS_APPROVED', 'SUPPLIER_REJECTED',
                          'PENDING_FINANCIAL_APPROVAL', 'FINANCIALLY_APPROVED',
                          'FINANCIALLY_REJECTED', 'ACTIVE')),
    vendor_id TEXT REFERENCES vendors(id),
    submitted_by_id TEXT REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS milestones (
    id TEXT PRIMARY KEY,
    sow_id TEXT NOT NULL REFERENCES sows(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    due_date TEXT,
    order_index INTEGER NOT NULL,
    recurring INTEGER NOT NULL DEFAULT 0,
    acceptance_criteria TEXT,
    acceptance_method TEXT
        CHECK (acceptance_method IN ('Sign-off', 'Test report', 'Demo', 'Documentation')),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sow_approvals (
    id TEXT PRIMARY KEY,
    sow_id TEXT NOT NULL REFERENCES sows(id) ON DELETE CASCADE,
    step TEXT NOT NULL CHECK (step IN ('OPS_REVIEW', 'SUPPLIER_REVIEW', 'FINANCIAL_APPROVAL')),
    status TEXT NOT NULL DEFAULT 'PENDING' CHECK (status IN ('PENDING', 'APPROVED', 'REJECTED')),
    ops_approver_id TEXT REFERENCES users(id),
    supplier_user_id TEXT REFERENCES users(id),
    financial_approver_id TEXT REFERENCES users(id),
    acted_at TEXT,
    comment TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS signature_authority_limits (
    user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    limit_amount_cents INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sows_status ON sows(status);
CREATE INDEX IF NOT EXISTS idx_milestones_sow ON milestones(sow_id);
CREATE INDEX IF NOT EXISTS idx_approvals_sow ON sow_approvals(sow_id);

-- One approval row per (SOW, step); transitions rely on upsert against this
CREATE UNIQUE INDEX IF NOT EXISTS idx_approvals_sow_step ON sow_approvals(sow_id, step);
"#;
