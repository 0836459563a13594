//! Workflow prompt templates.
//!
//! Each prompt is a Markdown guide that walks an agent through a common
//! workflow using the tools and resources this server exposes. A prompt takes
//! at most one optional string argument that is substituted into the text.

use serde_json::{Map, Value};

/// The single optional argument of a prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptArgSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Used when the argument is absent or blank.
    pub default: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub argument: Option<PromptArgSpec>,
    /// Description of a rendered prompt, given the argument value.
    pub summary: fn(&str) -> String,
    /// Markdown body, given the argument value.
    pub body: fn(&str) -> String,
}

/// A prompt filled in with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub description: String,
    pub text: String,
}

pub static PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        name: "plan-project",
        description: "Break a new project down into actionable tasks with phases, priorities \
                      and labels. Use when starting a new initiative or feature.",
        argument: Some(PromptArgSpec {
            name: "project_name",
            description: "Name of the project to plan (optional)",
            default: "[project name]",
        }),
        summary: plan_project_summary,
        body: plan_project,
    },
    PromptSpec {
        name: "daily-review",
        description: "Daily standup workflow: check overdue items, review priorities, find \
                      blockers and pick the day's focus.",
        argument: None,
        summary: daily_review_summary,
        body: daily_review,
    },
    PromptSpec {
        name: "sprint-planning",
        description: "Organize pending work into a focused iteration by reviewing the backlog, \
                      grouping it by priority and label, and setting goals.",
        argument: Some(PromptArgSpec {
            name: "sprint_duration",
            description: "Length of the sprint (optional, default: 2 weeks)",
            default: "2 weeks",
        }),
        summary: sprint_planning_summary,
        body: sprint_planning,
    },
    PromptSpec {
        name: "track-agent-work",
        description: "Guidelines for agents on when and how to record their work in toki, \
                      focused on outcomes a human cares about rather than internal steps.",
        argument: None,
        summary: track_agent_work_summary,
        body: track_agent_work,
    },
    PromptSpec {
        name: "coordinate-tasks",
        description: "Multi-agent collaboration: claim work with labels and priorities, check \
                      for related work, and keep status visible to others.",
        argument: None,
        summary: coordinate_tasks_summary,
        body: coordinate_tasks,
    },
    PromptSpec {
        name: "report-status",
        description: "Produce status updates from toki data for different audiences and \
                      time ranges.",
        argument: Some(PromptArgSpec {
            name: "time_range",
            description: "Period the report covers (optional, default: this week)",
            default: "this week",
        }),
        summary: report_status_summary,
        body: report_status,
    },
];

pub fn find_prompt(name: &str) -> Option<&'static PromptSpec> {
    PROMPTS.iter().find(|p| p.name == name)
}

impl PromptSpec {
    /// Fill in the template. Only the declared argument is accepted, and it must be a string.
    pub fn render(&self, args: Option<&Map<String, Value>>) -> Result<RenderedPrompt, String> {
        let empty = Map::new();
        let args = args.unwrap_or(&empty);

        if let Some(unknown) = args
            .keys()
            .find(|k| self.argument.is_none_or(|a| a.name != k.as_str()))
        {
            return Err(format!(
                "Unknown argument '{}' for prompt {}",
                unknown, self.name
            ));
        }

        let value = match self.argument {
            None => "",
            Some(arg) => match args.get(arg.name) {
                None | Some(Value::Null) => arg.default,
                Some(Value::String(s)) if s.trim().is_empty() => arg.default,
                Some(Value::String(s)) => s.trim(),
                Some(_) => return Err(format!("Argument '{}' must be a string", arg.name)),
            },
        };

        Ok(RenderedPrompt {
            description: (self.summary)(value),
            text: (self.body)(value),
        })
    }
}

fn plan_project_summary(name: &str) -> String {
    format!("Project planning workflow for: {}", name)
}

fn daily_review_summary(_: &str) -> String {
    "Daily standup and planning workflow".to_string()
}

fn sprint_planning_summary(duration: &str) -> String {
    format!("Sprint planning workflow for a {} iteration", duration)
}

fn track_agent_work_summary(_: &str) -> String {
    "Guidelines for agents tracking work in toki".to_string()
}

fn coordinate_tasks_summary(_: &str) -> String {
    "Multi-agent collaboration and task coordination workflow".to_string()
}

fn report_status_summary(range: &str) -> String {
    format!("Status reporting workflow for {}", range)
}

fn plan_project(name: &str) -> String {
    format!(
        r#"# Plan Project: {name}

## Overview
Turn a new body of work into a backlog of small, trackable tasks. You will
create the project, split it into phases, and add prioritized, labeled tasks
that can be followed through to completion.

## When to Use
- Starting a new feature, initiative or repository
- A large effort needs to be decomposed before anyone can start
- Work spans several phases or workstreams

## Workflow Steps

### Step 1: Create the Project
Call **create_project** with name="{name}". If the work lives in a git
repository, pass its absolute path so the toki command line picks the
project up automatically inside that directory. Keep the returned `id`.

### Step 2: Identify Phases
Split the work into 2-5 phases, for example "setup", "implementation",
"testing", "release". Each phase becomes a label.

### Step 3: Create the Tasks
For each phase call **create_task** with:
- description: an action ("Implement X", "Write Y"), at least 3 characters
- project_id: the id from Step 1
- priority: "high" for the critical path, "medium" for important work, "low" for nice-to-have
- labels: the phase label plus any topic labels
- notes: context, constraints or dependencies
- due_date: only for real deadlines, as YYYY-MM-DD or RFC 3339

Example: create_task(description="Design the database schema", project_id="...",
priority="high", labels=["setup", "database"], notes="Tables for users and posts")

### Step 4: Review the Breakdown
- list_tasks(project_id="...") for the full backlog
- list_tasks(project_id="...", priority="high") for the critical path
- list_tasks(project_id="...", label="setup") for a single phase

### Step 5: Record Dependencies
When one task blocks another, say so in the notes of the blocked task:
update_task(task_id="...", notes="Blocked by: design the database schema (a1b2c3)")

## Tips and Best Practices
- **Start broad:** 10-20 tasks is plenty to begin with. Break them down once work starts.
- **Consistent labels:** settle on phase labels early; filtering depends on them.
- **Honest priorities:** if everything is high priority, nothing is.
- **Short ids:** any unique prefix of at least 6 hex digits identifies a task.
- **Dates for milestones only:** overdue tasks show up in toki://tasks/overdue, so keep that list meaningful.

**Ready?** Create the project, pick the phases, add the tasks, then review them with list_tasks.
"#
    )
}

fn daily_review(_: &str) -> String {
    r#"# Daily Review

## Overview
A short standup routine: deal with overdue work, confirm what really is high
priority, spot stuck tasks and choose one to three things to finish today.

## When to Use
- At the start of a working day
- After finishing a large task, to decide what comes next
- Whenever the backlog feels overwhelming

## Workflow Steps

### Step 1: Overdue Tasks
Read **toki://tasks/overdue** or call list_tasks(overdue=true). A task is overdue
when it is pending and its due day is before today. For each one decide:
- **Do now:** it becomes today's focus
- **Reschedule:** update_task(task_id="...", due_date="YYYY-MM-DD")
- **Drop:** delete_task, or mark_done if it was finished already

### Step 2: High Priority
Read **toki://tasks/high-priority** or call list_tasks(done=false, priority="high").
Demote anything that is not truly urgent with update_task(priority="medium").

### Step 3: Stuck Tasks
Call list_tasks(done=false) and look at `created_at`. Tasks pending for more
than a week are usually blocked, too large or no longer wanted. Add notes about
what is blocking them, split them into smaller tasks, or delete them.

### Step 4: Today's Focus
Pick one to three tasks: overdue work that matters, high-priority items, and
tasks that unblock others. **toki://stats** shows whether the pending count is
growing and which task has been waiting longest.

### Step 5: Clean Up
Mark finished work with mark_done, reopen anything closed too early with
mark_undone, and add tasks for work discovered yesterday.

## Tips and Best Practices
- **Keep it short:** five minutes every day beats a long review once a month.
- **Overdue is information:** adjust the date and move on.
- **Limit the focus:** three items is realistic, ten is not.
- **Use the resources:** they are faster than composing filters by hand.
"#
    .to_string()
}

fn sprint_planning(duration: &str) -> String {
    format!(
        r#"# Sprint Planning

## Overview
Turn the pending backlog into a focused {duration} iteration with a few clear
goals and a realistic amount of work.

## When to Use
- Starting a new sprint or iteration
- The backlog has grown large and lost its shape
- Several people or agents need to agree on shared goals

## Workflow Steps

### Step 1: Review the Backlog
Read **toki://tasks/pending** or call list_tasks(done=false). Delete tasks that
no longer matter and mark_done anything already finished.

### Step 2: Check Priorities
Call list_tasks(done=false, priority="high"), then "medium" and "low". High
priority should stay well under a third of the backlog; fix the rest with
update_task.

### Step 3: Find Themes
Read **toki://labels** for the label vocabulary, then list_tasks(done=false,
label="...") per label to see where the work clusters.

### Step 4: Set Goals
Write down 2-4 goals that are specific and achievable in {duration}, each
backed by a handful of tasks.

### Step 5: Commit the Scope
Label the chosen tasks with a sprint label, for example
add_label(task_id="...", label="sprint-12"), or give them due dates at the end
of the sprint. Leave room for unplanned work: aim for 70-80% of capacity.

### Step 6: Sanity Check
list_tasks(done=false, label="sprint-12") should hold an amount of work you
have actually finished in {duration} before. Cut low-priority items if not.

## Tips and Best Practices
- **Under-commit:** finishing early beats carrying work over.
- **Few goals:** more than four goals means no focus.
- **Track progress:** list_tasks(label="sprint-12", done=true) shows what is done.
- **Adjust openly:** remove_label takes a task out of the sprint when priorities change.
"#
    )
}

fn track_agent_work(_: &str) -> String {
    r#"# Track Agent Work

## Overview
Guidance for agents on what deserves a task. toki is read by humans and by
other agents, so tasks should describe outcomes they care about, not every
internal step you take.

## When to Use
- You were given an assignment that spans more than one session
- Your work produces something another person or agent must act on
- You are blocked and someone needs to know

## What Deserves a Task
- **Deliverables:** "Draft the API design document"
- **Findings and recommendations:** "Compare three queue libraries and recommend one"
- **Blocked work:** "Waiting for credentials to test the payment integration"
- **Multi-session work:** "Finish the authentication module (about 60% done)"
- **Handoffs and decisions:** "Review needed for the migration script"

## What Does Not
- Reading a file, running a search, or a single test run
- Steps you will finish within the current response
- Scratch notes only you will ever read

Ask: would a human or another agent care that this exists?

## Workflow Steps

### Step 1: Check for Existing Work
Call list_tasks(done=false) and search for related tasks before creating new
ones. Prefer updating an existing task over creating a duplicate.

### Step 2: Create Outcome-Focused Tasks
create_task(description="Evaluate storage options for user profiles",
priority="medium", labels=["research"], notes="Criteria: cost, latency, ops effort")

### Step 3: Record Progress
Use update_task to put findings and status in `notes`. Notes are where the
next reader looks first.

### Step 4: Finish Properly
Call mark_done only when the outcome exists and its result is recorded in the
notes. If work turns out to be incomplete, mark_undone reopens it.

## Tips and Best Practices
- **One task per outcome:** not one per file, command or search.
- **Rich notes:** findings and next steps belong in the task.
- **Priority means blocking:** high priority is for work that blocks others.
- **Write for the list:** descriptions should make sense in list_tasks output.
"#
    .to_string()
}

fn coordinate_tasks(_: &str) -> String {
    r#"# Coordinate Tasks

## Overview
A workflow for several agents (and humans) sharing one toki database. Labels
signal who is working on what, priorities signal urgency, and notes carry the
details of every handoff.

## When to Use
- More than one agent works on the same project
- Work must be handed from one agent to another
- You need to know whether someone else already started something

## Workflow Steps

### Step 1: Look Before You Create
Call list_tasks(done=false) and list_tasks(done=false, label="in-progress").
If a matching task exists, claim it instead of creating another.

### Step 2: Claim Work
add_label(task_id="...", label="in-progress") and add a note naming who picked
it up. Create new tasks with create_task when nothing matches.

### Step 3: Signal Status
Agree on a small label vocabulary (see **toki://labels**): "in-progress",
"blocked", "needs-review". Swap labels with add_label and remove_label as the
status changes, and raise priority with update_task when work becomes urgent.

### Step 4: Hand Off
Before handing off, update the notes with what is done, what is left and
where the artifacts are. Then remove_label "in-progress" and add_label
"needs-review" or the label of the receiving specialty.

### Step 5: Pick Up Handoffs
Call list_tasks(done=false, label="needs-review") or the label for your
specialty. Read the notes, claim the task, and continue.

### Step 6: Resolve Blockers
Label blocked tasks "blocked" and say in the notes exactly what is needed.
When you can unblock someone, do it, note it, and remove the label.

## Tips and Best Practices
- **Check before create:** duplicates split attention and history.
- **Notes are the channel:** other agents read them, so be specific.
- **Clean labels:** remove stale status labels when handing off.
- **Regular check-ins:** **toki://stats** shows how the shared backlog is moving.
"#
    .to_string()
}

fn report_status(range: &str) -> String {
    format!(
        r#"# Report Status

## Overview
Build a status update for {range} from the data in toki: what was finished,
what is in progress, what is blocked, and a few numbers that show the trend.

## When to Use
- Daily standups and weekly updates
- Sprint reviews with stakeholders
- Any time someone asks "where are we?"

## Workflow Steps

### Step 1: Pick the Audience
- **Team standup:** task level detail, blockers first
- **Manager update:** goals, progress and risks
- **Stakeholders:** outcomes and dates, little detail

### Step 2: Completed Work
Call list_tasks(done=true) and keep the tasks whose `completed_at` falls within
{range}. Group them by project or label.

### Step 3: Work in Progress
Call list_tasks(done=false, priority="high") and list_tasks(done=false,
label="in-progress"). Use the notes for a one-line status of each.

### Step 4: Blockers and Risks
Read **toki://tasks/overdue** and list_tasks(done=false, label="blocked").
Report what is needed to unblock each item and who can provide it.

### Step 5: Metrics
Read **toki://stats** for totals, pending and completed counts, overdue
count, the per-priority and per-project breakdown, and the oldest pending task.

### Step 6: Write the Report
Lead with the outcome, then progress, then blockers and the plan for the next
period. Keep it short enough to read in a minute.

## Tips and Best Practices
- **Lead with results:** finished work first, activity second.
- **Name blockers plainly:** a report is the place to ask for help.
- **Numbers with context:** "12 pending, down from 18" says more than "12 pending".
- **Same shape every time:** a stable format makes trends visible.
"#
    )
}
